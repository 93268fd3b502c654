#![forbid(unsafe_code)]

//! The name-then-distance matcher.

use ahash::AHashMap;
use geotree_core::{Coord, FeatureTree, GeoKey};
#[cfg(feature = "tracing")]
use web_time::Instant;

use crate::map::ReconciliationMap;
use crate::renderable::Renderable;

/// Match every placemark leaf to at most one unclaimed instance.
///
/// Instances carrying geometry are pooled by trimmed name; a parallel
/// exact geo-key index over the same instances backs the last-resort
/// fallback. Placemarks claim instances greedily in document order:
///
/// - a single unclaimed name candidate is taken as-is;
/// - several candidates are tie-broken by great-circle distance from the
///   placemark's coordinate (candidates without one rank last, ties keep
///   pool order), or by pool order when the placemark has no coordinate;
/// - with no name candidate left, the exact geo-key fallback assigns
///   every unclaimed instance under the placemark's key.
///
/// Claimed instances are never reassigned, which keeps the result
/// injective. Unmatched placemarks get no entry — that is an accepted
/// outcome, not an error. The whole pass is deterministic for a given
/// `(tree, instances)` pair.
#[must_use]
pub fn reconcile<R: Renderable>(tree: &FeatureTree, instances: &[R]) -> ReconciliationMap {
    #[cfg(feature = "tracing")]
    let start = Instant::now();

    let mut pools: AHashMap<&str, Vec<usize>> = AHashMap::new();
    let mut by_key: AHashMap<GeoKey, Vec<usize>> = AHashMap::new();
    for (idx, instance) in instances.iter().enumerate() {
        if !instance.geometry().carries_geometry() {
            continue;
        }
        pools.entry(instance.name().trim()).or_default().push(idx);
        by_key
            .entry(GeoKey::new(instance.name(), instance.position()))
            .or_default()
            .push(idx);
    }

    let mut claimed = vec![false; instances.len()];
    let mut map = ReconciliationMap::new();
    #[cfg(feature = "tracing")]
    let mut unmatched = 0usize;

    for id in tree.placemark_ids() {
        let Some(node) = tree.get(id) else { continue };
        let Some(key) = node.geo_keys().first() else {
            continue;
        };

        let unclaimed: Vec<usize> = pools
            .get(node.name().trim())
            .map(|pool| pool.iter().copied().filter(|&i| !claimed[i]).collect())
            .unwrap_or_default();

        let assigned: Vec<usize> = match unclaimed.len() {
            0 => by_key
                .get(key)
                .map(|hits| hits.iter().copied().filter(|&i| !claimed[i]).collect())
                .unwrap_or_default(),
            1 => unclaimed,
            _ => {
                let pick = match node.coordinate() {
                    Some(coord) => nearest(&unclaimed, instances, coord),
                    None => unclaimed[0],
                };
                vec![pick]
            }
        };

        if assigned.is_empty() {
            #[cfg(feature = "tracing")]
            {
                unmatched += 1;
            }
            continue;
        }
        for &idx in &assigned {
            claimed[idx] = true;
        }
        map.extend(key.clone(), assigned);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        message = "reconcile.metrics",
        placemarks = tree.placemark_count(),
        instances = instances.len(),
        pools = pools.len(),
        matched_keys = map.key_count(),
        matched_instances = map.instance_count(),
        unmatched,
        duration_us = start.elapsed().as_micros() as u64,
    );

    map
}

/// Index of the candidate nearest to `from`, stable on ties.
fn nearest<R: Renderable>(candidates: &[usize], instances: &[R], from: Coord) -> usize {
    let mut best = candidates[0];
    let mut best_distance = f64::INFINITY;
    for &idx in candidates {
        let distance = instances[idx]
            .position()
            .map_or(f64::INFINITY, |p| from.distance_m(&p));
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }
    best
}
