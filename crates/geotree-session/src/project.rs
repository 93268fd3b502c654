#![forbid(unsafe_code)]

//! Visibility projection.
//!
//! Turns the tree's toggle state and the reconciliation map into
//! `visible` writes on every instance. Two branches are required to fail
//! open: an empty map and a never-interacted session must both show
//! everything. The system may never hide all geometry because of a
//! mapping gap or before a deliberate user action.

use ahash::AHashSet;
use geotree_core::{FeatureTree, GeoKey};
use geotree_reconcile::{Renderable, ReconciliationMap};

/// Apply show/hide and label flags to every instance.
///
/// `interacted` is true once the user has changed any checked state;
/// until then projection is fully permissive regardless of toggle state.
/// In authoritative mode everything is hidden first, then instances
/// mapped from effectively checked placemark leaves are shown; instances
/// the reconciler left unmapped stay hidden. Label and marker visibility
/// follow `hide_labels` independently in every mode.
pub fn apply_visibility<R: Renderable>(
    tree: &FeatureTree,
    map: &ReconciliationMap,
    interacted: bool,
    hide_labels: bool,
    instances: &mut [R],
) {
    if map.is_empty() || !interacted {
        for instance in instances.iter_mut() {
            instance.set_visible(true);
        }
        apply_label_flags(hide_labels, instances);
        tracing::debug!(
            message = "visibility.apply",
            mode = if map.is_empty() {
                "fail_open_empty_map"
            } else {
                "permissive_preload"
            },
            instances = instances.len(),
        );
        return;
    }

    let enabled: AHashSet<&GeoKey> = tree
        .placemark_ids()
        .filter(|&id| tree.effective_checked(id))
        .filter_map(|id| tree.get(id).and_then(|n| n.geo_keys().first()))
        .collect();

    for instance in instances.iter_mut() {
        instance.set_visible(false);
    }
    let mut shown = 0usize;
    for &key in &enabled {
        for &idx in map.instances_for(key) {
            if let Some(instance) = instances.get_mut(idx) {
                instance.set_visible(true);
                shown += 1;
            }
        }
    }
    apply_label_flags(hide_labels, instances);

    tracing::debug!(
        message = "visibility.apply",
        mode = "authoritative",
        enabled_keys = enabled.len(),
        shown,
        instances = instances.len(),
    );
}

fn apply_label_flags<R: Renderable>(hide_labels: bool, instances: &mut [R]) {
    for instance in instances.iter_mut() {
        instance.set_label_visible(!hide_labels);
        instance.set_marker_visible(!hide_labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotree_core::{Coord, FeatureElement};
    use geotree_reconcile::{GeometryPresence, reconcile};

    #[derive(Debug, Clone)]
    struct Inst {
        name: String,
        position: Option<Coord>,
        visible: bool,
        label_visible: bool,
        marker_visible: bool,
    }

    impl Inst {
        fn at(name: &str, lon: f64, lat: f64) -> Self {
            Self {
                name: name.to_owned(),
                position: Some(Coord::new(lon, lat)),
                visible: false,
                label_visible: true,
                marker_visible: true,
            }
        }
    }

    impl Renderable for Inst {
        fn name(&self) -> &str {
            &self.name
        }

        fn geometry(&self) -> GeometryPresence {
            GeometryPresence::Point
        }

        fn position(&self) -> Option<Coord> {
            self.position
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn set_label_visible(&mut self, visible: bool) {
            self.label_visible = visible;
        }

        fn set_marker_visible(&mut self, visible: bool) {
            self.marker_visible = visible;
        }
    }

    fn tree_and_instances() -> (geotree_core::FeatureTree, Vec<Inst>) {
        let tree = geotree_core::FeatureTree::build(
            FeatureElement::folder("root")
                .child(FeatureElement::placemark("A", Some(Coord::new(0.0, 0.0))))
                .child(FeatureElement::placemark("B", Some(Coord::new(1.0, 1.0)))),
        );
        let instances = vec![Inst::at("A", 0.0, 0.0), Inst::at("B", 1.0, 1.0)];
        (tree, instances)
    }

    #[test]
    fn empty_map_fails_open() {
        let (mut tree, mut instances) = tree_and_instances();
        tree.uncheck_all();
        let map = ReconciliationMap::new();
        apply_visibility(&tree, &map, true, false, &mut instances);
        assert!(instances.iter().all(|i| i.visible));
    }

    #[test]
    fn pre_interaction_fails_open() {
        let (mut tree, mut instances) = tree_and_instances();
        let map = reconcile(&tree, &instances);
        tree.uncheck_all();
        apply_visibility(&tree, &map, false, false, &mut instances);
        assert!(instances.iter().all(|i| i.visible));
    }

    #[test]
    fn authoritative_shows_only_enabled_keys() {
        let (mut tree, mut instances) = tree_and_instances();
        let map = reconcile(&tree, &instances);
        let b = tree
            .iter()
            .find(|n| n.name() == "B")
            .map(|n| n.id())
            .expect("B");
        tree.set_checked_recursive(b, false);
        tree.recompute_indeterminate_up(b);
        apply_visibility(&tree, &map, true, false, &mut instances);
        assert!(instances[0].visible);
        assert!(!instances[1].visible);
    }

    #[test]
    fn unchecked_ancestor_masks_leaf() {
        let mut tree = geotree_core::FeatureTree::build(
            FeatureElement::folder("root").child(
                FeatureElement::folder("F")
                    .child(FeatureElement::placemark("A", Some(Coord::new(0.0, 0.0)))),
            ),
        );
        let mut instances = vec![Inst::at("A", 0.0, 0.0)];
        let map = reconcile(&tree, &instances);

        let f = tree
            .iter()
            .find(|n| n.name() == "F")
            .map(|n| n.id())
            .expect("F");
        let a = tree
            .iter()
            .find(|n| n.name() == "A")
            .map(|n| n.id())
            .expect("A");
        tree.set_checked_recursive(f, false);
        tree.set_checked_recursive(a, true);
        apply_visibility(&tree, &map, true, false, &mut instances);
        assert!(!instances[0].visible);
    }

    #[test]
    fn unmapped_instances_stay_hidden_in_authoritative_mode() {
        let (tree, mut instances) = tree_and_instances();
        instances.push(Inst::at("Stray", 9.0, 9.0));
        let map = reconcile(&tree, &instances);
        apply_visibility(&tree, &map, true, false, &mut instances);
        assert!(instances[0].visible);
        assert!(instances[1].visible);
        assert!(!instances[2].visible);
    }

    #[test]
    fn label_flags_follow_hide_labels_independently() {
        let (tree, mut instances) = tree_and_instances();
        let map = reconcile(&tree, &instances);
        apply_visibility(&tree, &map, true, true, &mut instances);
        for instance in &instances {
            assert!(instance.visible);
            assert!(!instance.label_visible);
            assert!(!instance.marker_visible);
        }

        apply_visibility(&tree, &map, true, false, &mut instances);
        for instance in &instances {
            assert!(instance.label_visible);
            assert!(instance.marker_visible);
        }
    }

    #[test]
    fn label_flags_apply_in_fail_open_modes_too() {
        let (tree, mut instances) = tree_and_instances();
        let map = ReconciliationMap::new();
        apply_visibility(&tree, &map, false, true, &mut instances);
        assert!(instances.iter().all(|i| i.visible && !i.label_visible));
    }
}
