#![forbid(unsafe_code)]

//! Flattened control rows for the presentation layer.
//!
//! The tree renders as a column of checkbox rows. This module produces
//! that column: expanded nodes contribute their children, and an optional
//! name filter narrows the rows to matches and their ancestors. Filtering
//! affects only which controls are visible, never geometry visibility.

use crate::element::FeatureKind;
use crate::tree::{FeatureTree, NodeId};

/// One renderable control row.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow<'t> {
    /// Node this row represents.
    pub id: NodeId,
    /// Nesting depth; the root is 0.
    pub depth: usize,
    /// Display name.
    pub name: &'t str,
    /// Folder or placemark.
    pub kind: FeatureKind,
    /// Whether the node has no children.
    pub is_leaf: bool,
    /// Tri-state checked bit.
    pub checked: bool,
    /// Tri-state mixed bit.
    pub indeterminate: bool,
    /// Expansion as presented (a filter can force ancestors open).
    pub expanded: bool,
}

/// Flatten the tree into control rows.
///
/// With an empty (or whitespace) filter this walks expanded nodes only.
/// With a filter, a node is kept when its name matches case-insensitively
/// or a descendant's does; non-matching ancestors of matches present as
/// expanded so the matches are reachable, while matching nodes keep their
/// own expansion (and their whole subtree).
#[must_use]
pub fn visible_rows<'t>(tree: &'t FeatureTree, filter: &str) -> Vec<TreeRow<'t>> {
    let mut rows = Vec::new();
    let filter = filter.trim();
    if filter.is_empty() {
        emit_plain(tree, tree.root_id(), 0, &mut rows);
        return rows;
    }

    let needle = filter.to_lowercase();
    // Reverse preorder sweep: children carry larger ids than parents, so
    // subtree match bits are complete before each parent reads them.
    let mut subtree_match = vec![false; tree.len()];
    for idx in (0..tree.len()).rev() {
        let id = NodeId::new(idx);
        let node = tree.node(id);
        let own = node.name().to_lowercase().contains(&needle);
        let descendant = node
            .children()
            .iter()
            .any(|c| subtree_match[c.index()]);
        subtree_match[idx] = own || descendant;
    }

    emit_filtered(
        tree,
        tree.root_id(),
        0,
        &needle,
        &subtree_match,
        false,
        &mut rows,
    );
    rows
}

fn emit_plain<'t>(tree: &'t FeatureTree, id: NodeId, depth: usize, out: &mut Vec<TreeRow<'t>>) {
    let node = tree.node(id);
    out.push(TreeRow {
        id,
        depth,
        name: node.name(),
        kind: node.kind(),
        is_leaf: node.children().is_empty(),
        checked: node.checked(),
        indeterminate: node.indeterminate(),
        expanded: node.expanded(),
    });
    if node.expanded() {
        for &child in node.children() {
            emit_plain(tree, child, depth + 1, out);
        }
    }
}

fn emit_filtered<'t>(
    tree: &'t FeatureTree,
    id: NodeId,
    depth: usize,
    needle: &str,
    subtree_match: &[bool],
    ancestor_matched: bool,
    out: &mut Vec<TreeRow<'t>>,
) {
    let node = tree.node(id);
    let own_match = ancestor_matched || node.name().to_lowercase().contains(needle);
    if !own_match && !subtree_match[id.index()] {
        return;
    }

    // A node shown only because a descendant matched is forced open;
    // a matching node keeps its own expansion.
    let expanded = if own_match { node.expanded() } else { true };
    out.push(TreeRow {
        id,
        depth,
        name: node.name(),
        kind: node.kind(),
        is_leaf: node.children().is_empty(),
        checked: node.checked(),
        indeterminate: node.indeterminate(),
        expanded,
    });
    if expanded {
        for &child in node.children() {
            emit_filtered(tree, child, depth + 1, needle, subtree_match, own_match, out);
        }
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
                    FeatureElement::folder("Sites")
                        .child(FeatureElement::placemark("Alpha", None))
                        .child(FeatureElement::placemark("Beta", None)),
                )
                .child(
                    FeatureElement::folder("Routes")
                        .child(FeatureElement::placemark("Ridge line", None)),
                ),
        )
    }

    fn names<'t>(rows: &[TreeRow<'t>]) -> Vec<&'t str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn flatten_preorder_when_expanded() {
        let tree = sample();
        let rows = visible_rows(&tree, "");
        assert_eq!(
            names(&rows),
            vec!["root", "Sites", "Alpha", "Beta", "Routes", "Ridge line"]
        );
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[2].depth, 2);
    }

    #[test]
    fn collapsed_folder_hides_children() {
        let mut tree = sample();
        let sites = tree.iter().find(|n| n.name() == "Sites").map(|n| n.id());
        tree.toggle_expanded(sites.expect("Sites"));
        let rows = visible_rows(&tree, "");
        assert_eq!(names(&rows), vec!["root", "Sites", "Routes", "Ridge line"]);
    }

    #[test]
    fn filter_keeps_matches_and_ancestors() {
        let tree = sample();
        let rows = visible_rows(&tree, "alpha");
        assert_eq!(names(&rows), vec!["root", "Sites", "Alpha"]);
    }

    #[test]
    fn filter_is_case_insensitive_and_trimmed() {
        let tree = sample();
        let rows = visible_rows(&tree, "  RIDGE  ");
        assert_eq!(names(&rows), vec!["root", "Routes", "Ridge line"]);
    }

    #[test]
    fn filter_forces_collapsed_ancestors_open() {
        let mut tree = sample();
        tree.collapse_all();
        let rows = visible_rows(&tree, "beta");
        assert_eq!(names(&rows), vec!["root", "Sites", "Beta"]);
        // "Sites" itself does not match; it is presented expanded.
        assert!(rows[1].expanded);
    }

    #[test]
    fn matching_folder_shows_whole_subtree() {
        let tree = sample();
        let rows = visible_rows(&tree, "sites");
        assert_eq!(names(&rows), vec!["root", "Sites", "Alpha", "Beta"]);
    }

    #[test]
    fn matching_collapsed_folder_keeps_own_expansion() {
        let mut tree = sample();
        let sites = tree
            .iter()
            .find(|n| n.name() == "Sites")
            .map(|n| n.id())
            .expect("Sites");
        tree.toggle_expanded(sites);
        let rows = visible_rows(&tree, "sites");
        assert_eq!(names(&rows), vec!["root", "Sites"]);
        assert!(!rows[1].expanded);
    }

    #[test]
    fn filter_without_matches_yields_nothing() {
        let tree = sample();
        assert!(visible_rows(&tree, "zebra").is_empty());
    }

    #[test]
    fn rows_reflect_toggle_state() {
        let mut tree = sample();
        let alpha = tree
            .iter()
            .find(|n| n.name() == "Alpha")
            .map(|n| n.id())
            .expect("Alpha");
        tree.set_checked_recursive(alpha, false);
        tree.recompute_indeterminate_up(alpha);
        let rows = visible_rows(&tree, "");
        let sites = rows.iter().find(|r| r.name == "Sites").expect("Sites row");
        assert!(sites.indeterminate);
        let alpha = rows.iter().find(|r| r.name == "Alpha").expect("Alpha row");
        assert!(!alpha.checked);
        assert!(alpha.is_leaf);
    }
}
