#![forbid(unsafe_code)]

//! Tri-state toggle engine.
//!
//! Per-node state is `{checked, indeterminate}` with two constraints:
//! `indeterminate` implies `checked` (the visual "mixed" state), and only
//! folders with at least one child may be indeterminate. The engine keeps
//! the tree consistent with two one-directional passes over the arena — a
//! downward cascade and an upward reclassification — never with mutual
//! recursion through node references.

use crate::element::FeatureKind;
use crate::tree::{FeatureTree, NodeId};

/// How a folder's children classify for the upward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildClass {
    AllChecked,
    AllUnchecked,
    Mixed,
}

impl FeatureTree {
    /// Set `checked` on a node and every descendant, clearing mixed state.
    ///
    /// Unconditionally overrides prior indeterminate marks; side effect on
    /// tree state only. Pair with [`FeatureTree::recompute_indeterminate_up`]
    /// on the node's parent to restore ancestor consistency.
    pub fn set_checked_recursive(&mut self, id: NodeId, value: bool) {
        if self.get(id).is_none() {
            return;
        }
        #[cfg(feature = "tracing")]
        let mut touched = 0usize;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            node.checked = value;
            node.indeterminate = false;
            stack.extend(node.children.iter().copied());
            #[cfg(feature = "tracing")]
            {
                touched += 1;
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.cascade",
            node = id.index(),
            value,
            touched
        );
    }

    /// Reclassify each folder from `id` up to and including the root.
    ///
    /// All children checked and not mixed → `(checked, clear)`; all
    /// unchecked and not mixed → `(unchecked, clear)`; otherwise the
    /// folder is mixed. Childless folders are never indeterminate and are
    /// left untouched by this walk.
    pub fn recompute_indeterminate_up(&mut self, id: NodeId) {
        if self.get(id).is_none() {
            return;
        }
        let mut current = Some(id);
        while let Some(cur) = current {
            self.reclassify(cur);
            current = self.node(cur).parent();
        }
    }

    /// Apply the classification rule to one node, if it is a folder with
    /// children.
    fn reclassify(&mut self, id: NodeId) {
        let node = self.node(id);
        if node.kind() != FeatureKind::Folder || node.children().is_empty() {
            return;
        }
        let class = self.classify_children(id);
        let node = self.node_mut(id);
        match class {
            ChildClass::AllChecked => {
                node.checked = true;
                node.indeterminate = false;
            }
            ChildClass::AllUnchecked => {
                node.checked = false;
                node.indeterminate = false;
            }
            ChildClass::Mixed => {
                node.checked = true;
                node.indeterminate = true;
            }
        }
    }

    fn classify_children(&self, id: NodeId) -> ChildClass {
        let mut all_checked = true;
        let mut all_unchecked = true;
        for &child in self.node(id).children() {
            let child = self.node(child);
            if !(child.checked && !child.indeterminate) {
                all_checked = false;
            }
            if !(!child.checked && !child.indeterminate) {
                all_unchecked = false;
            }
        }
        if all_checked {
            ChildClass::AllChecked
        } else if all_unchecked {
            ChildClass::AllUnchecked
        } else {
            ChildClass::Mixed
        }
    }

    /// Set `expanded` on the node and every descendant that has children.
    ///
    /// Checked/indeterminate state is untouched. Leaves never expand.
    pub fn set_expanded_recursive(&mut self, id: NodeId, value: bool) {
        if self.get(id).is_none() {
            return;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            if !node.children.is_empty() {
                node.expanded = value;
            }
            stack.extend(node.children.iter().copied());
        }
    }

    /// Flip one node's expansion. No effect on leaves.
    pub fn toggle_expanded(&mut self, id: NodeId) {
        if let Some(node) = self.get(id)
            && !node.children().is_empty()
        {
            let node = self.node_mut(id);
            node.expanded = !node.expanded;
        }
    }

    /// Whether the node and every ancestor up to the root are checked.
    ///
    /// This is the visibility query, not `node.checked`: a node can be
    /// individually checked while an unchecked ancestor masks it.
    #[must_use]
    pub fn effective_checked(&self, id: NodeId) -> bool {
        let Some(mut node) = self.get(id) else {
            return false;
        };
        loop {
            if !node.checked {
                return false;
            }
            match node.parent() {
                Some(parent) => node = self.node(parent),
                None => return true,
            }
        }
    }

    /// Check the whole tree.
    pub fn check_all(&mut self) {
        let root = self.root_id();
        self.set_checked_recursive(root, true);
    }

    /// Uncheck everything, leaving the root rendered as mixed.
    ///
    /// "Nothing selected" must read as a mixed root, not a false one, so
    /// the root keeps `checked` and gains `indeterminate`.
    pub fn uncheck_all(&mut self) {
        let root = self.root_id();
        self.set_checked_recursive(root, false);
        let node = self.node_mut(root);
        node.checked = true;
        node.indeterminate = true;
    }

    /// Expand every node that has children.
    pub fn expand_all(&mut self) {
        let root = self.root_id();
        self.set_expanded_recursive(root, true);
    }

    /// Collapse everything, re-expanding only the root for navigability.
    pub fn collapse_all(&mut self) {
        let root = self.root_id();
        self.set_expanded_recursive(root, false);
        self.node_mut(root).expanded = true;
    }

    /// Reclassify every folder bottom-up.
    ///
    /// Preorder ids guarantee children carry larger ids than their parent,
    /// so a reverse id sweep sees children before parents.
    pub fn recompute_all(&mut self) {
        for idx in (0..self.len()).rev() {
            self.reclassify(NodeId::new(idx));
        }
    }
}
