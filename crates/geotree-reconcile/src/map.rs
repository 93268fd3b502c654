#![forbid(unsafe_code)]

//! The reconciliation result.

use ahash::AHashMap;
use geotree_core::GeoKey;

/// Mapping from geo-keys to the instance indices assigned to them.
///
/// Indices point into the engine collection slice the map was built
/// against; the map is discarded with that collection on the next load.
/// A key usually maps to one index, but geo-key collisions and the
/// exact-key fallback can assign several. The matcher's claim set keeps
/// the map injective: no index appears under more than one key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationMap {
    entries: AHashMap<GeoKey, Vec<usize>>,
}

impl ReconciliationMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no placemark was matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys with at least one assignment.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of assigned instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Instance indices assigned to `key`; empty when unmatched.
    #[must_use]
    pub fn instances_for(&self, key: &GeoKey) -> &[usize] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Iterate `(key, indices)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&GeoKey, &[usize])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub(crate) fn extend(&mut self, key: GeoKey, indices: impl IntoIterator<Item = usize>) {
        self.entries.entry(key).or_default().extend(indices);
    }
}
