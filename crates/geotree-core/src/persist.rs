#![forbid(unsafe_code)]

//! Toggle-state persistence.
//!
//! Hosts can capture which subtrees a user collapsed or unchecked and
//! re-apply them after the same document is rebuilt (a reload, the next
//! run). Nodes are addressed by their name path from the root; freshly
//! built trees default to expanded and checked, so a snapshot records the
//! exceptions only. Duplicate-named siblings share a path and therefore a
//! recorded state — accepted, as with any path-addressed scheme.

use std::collections::HashSet;

use crate::tree::{FeatureTree, NodeId};

/// Persistable toggle state for a [`FeatureTree`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ToggleState {
    /// Name paths (e.g. `"root/Sites"`) of collapsed nodes with children.
    pub collapsed_paths: HashSet<String>,
    /// Name paths of unchecked nodes.
    pub unchecked_paths: HashSet<String>,
}

impl ToggleState {
    /// Capture the exceptions from the tree's current state.
    #[must_use]
    pub fn capture(tree: &FeatureTree) -> Self {
        let mut state = Self::default();
        collect(tree, tree.root_id(), "", &mut state);
        state
    }

    /// Re-apply the captured exceptions onto a freshly built tree.
    ///
    /// Leaf and folder checked bits are restored from the recorded paths,
    /// then every folder is reclassified bottom-up so indeterminate marks
    /// come out consistent rather than being trusted from the snapshot.
    pub fn apply(&self, tree: &mut FeatureTree) {
        apply_at(tree, tree.root_id(), "", self);
        tree.recompute_all();
    }

    /// Whether the snapshot records no exceptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collapsed_paths.is_empty() && self.unchecked_paths.is_empty()
    }
}

fn path_of(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

fn collect(tree: &FeatureTree, id: NodeId, prefix: &str, out: &mut ToggleState) {
    let node = tree.node(id);
    let path = path_of(prefix, node.name());

    if !node.children().is_empty() && !node.expanded() {
        out.collapsed_paths.insert(path.clone());
    }
    if !node.checked() {
        out.unchecked_paths.insert(path.clone());
    }
    for &child in node.children() {
        collect(tree, child, &path, out);
    }
}

fn apply_at(tree: &mut FeatureTree, id: NodeId, prefix: &str, state: &ToggleState) {
    let node = tree.node(id);
    let path = path_of(prefix, node.name());
    let children: Vec<NodeId> = node.children().to_vec();

    let node = tree.node_mut(id);
    if !node.children.is_empty() {
        node.expanded = !state.collapsed_paths.contains(&path);
    }
    if state.unchecked_paths.contains(&path) {
        node.checked = false;
        node.indeterminate = false;
    }

    for child in children {
        apply_at(tree, child, &path, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::FeatureElement;

    fn sample() -> FeatureTree {
        FeatureTree::build(
            FeatureElement::folder("root")
                .child(
                    FeatureElement::folder("A")
                        .child(FeatureElement::placemark("P1", None))
                        .child(FeatureElement::placemark("P2", None)),
                )
                .child(FeatureElement::placemark("P3", None)),
        )
    }

    fn id_of(tree: &FeatureTree, name: &str) -> NodeId {
        tree.iter()
            .find(|n| n.name() == name)
            .map(|n| n.id())
            .expect("fixture node")
    }

    #[test]
    fn pristine_tree_captures_empty_state() {
        let state = ToggleState::capture(&sample());
        assert!(state.is_empty());
    }

    #[test]
    fn capture_records_exceptions_by_path() {
        let mut tree = sample();
        tree.toggle_expanded(id_of(&tree, "A"));
        tree.set_checked_recursive(id_of(&tree, "P1"), false);
        let state = ToggleState::capture(&tree);
        assert!(state.collapsed_paths.contains("root/A"));
        assert!(state.unchecked_paths.contains("root/A/P1"));
        assert_eq!(state.unchecked_paths.len(), 1);
    }

    #[test]
    fn apply_restores_state_onto_fresh_tree() {
        let mut tree = sample();
        tree.toggle_expanded(id_of(&tree, "A"));
        tree.set_checked_recursive(id_of(&tree, "P1"), false);
        tree.recompute_indeterminate_up(id_of(&tree, "A"));
        let state = ToggleState::capture(&tree);

        let mut fresh = sample();
        state.apply(&mut fresh);
        assert!(!fresh.node(id_of(&fresh, "A")).expanded());
        assert!(!fresh.node(id_of(&fresh, "P1")).checked());
        // Indeterminate marks are recomputed, not replayed.
        assert!(fresh.node(id_of(&fresh, "A")).indeterminate());
        assert!(fresh.node(fresh.root_id()).indeterminate());
    }

    #[test]
    fn apply_recomputes_fully_unchecked_folders() {
        let mut tree = sample();
        tree.set_checked_recursive(id_of(&tree, "P1"), false);
        tree.set_checked_recursive(id_of(&tree, "P2"), false);
        tree.recompute_indeterminate_up(id_of(&tree, "A"));
        let state = ToggleState::capture(&tree);
        // The folder itself was reclassified unchecked and recorded too.
        assert!(state.unchecked_paths.contains("root/A"));

        let mut fresh = sample();
        state.apply(&mut fresh);
        let a = fresh.node(id_of(&fresh, "A"));
        assert!(!a.checked());
        assert!(!a.indeterminate());
    }

    #[test]
    fn stale_paths_are_ignored() {
        let mut state = ToggleState::default();
        state.unchecked_paths.insert("root/Gone".to_owned());
        state.collapsed_paths.insert("elsewhere".to_owned());
        let mut tree = sample();
        state.apply(&mut tree);
        for node in tree.iter() {
            assert!(node.checked());
        }
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn serde_round_trip() {
        let mut tree = sample();
        tree.toggle_expanded(id_of(&tree, "A"));
        tree.set_checked_recursive(id_of(&tree, "P3"), false);
        let state = ToggleState::capture(&tree);

        let json = serde_json::to_string(&state).expect("serialize");
        let back: ToggleState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(state, back);
    }
}
