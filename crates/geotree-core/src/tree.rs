#![forbid(unsafe_code)]

//! The feature tree arena and its builder.
//!
//! Nodes live in a flat `Vec` addressed by [`NodeId`]; parent/child links
//! are ids, never references, so the downward cascade and the upward
//! recomputation in [`crate::toggle`] stay one-directional loops with
//! obvious termination. The tree is built once per loaded document and
//! replaced wholesale on the next load — ids are stable for the lifetime
//! of one document and meaningless across loads.

use ahash::AHashSet;

use crate::element::{FeatureElement, FeatureKind};
use crate::geo::{Coord, GeoKey};

/// Identifier for a node in one loaded document's tree.
///
/// A plain arena index: assigned monotonically in build (preorder) and
/// never reused within a document. There is no generation counter because
/// the arena is immutable after build — a stale id can only come from a
/// previous document, which callers must not retain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// Arena slot of this node.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One folder, document root, or placemark in the feature tree.
#[derive(Debug, Clone)]
pub struct FeatureNode {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) name: String,
    pub(crate) kind: FeatureKind,
    pub(crate) coordinate: Option<Coord>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) checked: bool,
    pub(crate) indeterminate: bool,
    pub(crate) expanded: bool,
    pub(crate) geo_keys: Vec<GeoKey>,
}

impl FeatureNode {
    /// This node's id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owning parent; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Display name (structural tag when the source had no name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder or placemark.
    #[must_use]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// First discoverable geometry vertex, placemarks only.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coord> {
        self.coordinate
    }

    /// Ordered child ids (document order). Empty for placemarks.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node is a placemark leaf.
    #[must_use]
    pub fn is_placemark(&self) -> bool {
        self.kind == FeatureKind::Placemark
    }

    /// Tri-state: checked (possibly mixed when `indeterminate` is set).
    #[must_use]
    pub fn checked(&self) -> bool {
        self.checked
    }

    /// Tri-state: mixed. Implies `checked`; folders with children only.
    #[must_use]
    pub fn indeterminate(&self) -> bool {
        self.indeterminate
    }

    /// Whether the node's children are shown in the control tree.
    #[must_use]
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Geo-keys reachable in this node's subtree.
    ///
    /// A placemark holds exactly one; a folder holds the de-duplicated
    /// union of its descendants' keys in first-seen order.
    #[must_use]
    pub fn geo_keys(&self) -> &[GeoKey] {
        &self.geo_keys
    }
}

/// Id-addressed arena of [`FeatureNode`]s for one loaded document.
#[derive(Debug, Clone)]
pub struct FeatureTree {
    nodes: Vec<FeatureNode>,
    root: NodeId,
}

impl FeatureTree {
    /// Build a tree from the parser's root element.
    ///
    /// Depth-first, assigning preorder ids. A placemark's key set is the
    /// singleton key of its own name and first vertex (name-only when no
    /// coordinate parsed); a folder's is the bottom-up de-duplicated union
    /// of its children's, computed during the same traversal. All nodes
    /// start checked; folders start expanded. Placemark children, if a
    /// parser ever produces them, are not traversed — placemarks are
    /// leaves in this model.
    #[must_use]
    pub fn build(root: FeatureElement) -> Self {
        let mut nodes = Vec::new();
        build_into(&mut nodes, root, None);
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Root node id.
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&FeatureNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node(&self, id: NodeId) -> &FeatureNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut FeatureNode {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes (never true for a built tree).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in id (preorder document) order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureNode> {
        self.nodes.iter()
    }

    /// Ids of all placemark leaves in document order.
    pub fn placemark_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.is_placemark())
            .map(|n| n.id)
    }

    /// Number of placemark leaves.
    #[must_use]
    pub fn placemark_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_placemark()).count()
    }
}

/// Append `element` and its subtree to the arena, returning the new id.
fn build_into(
    nodes: &mut Vec<FeatureNode>,
    element: FeatureElement,
    parent: Option<NodeId>,
) -> NodeId {
    let id = NodeId::new(nodes.len());
    let name = match element.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => element.tag,
    };
    let is_placemark = element.kind == FeatureKind::Placemark;

    nodes.push(FeatureNode {
        id,
        parent,
        name,
        kind: element.kind,
        coordinate: element.coordinate,
        children: Vec::new(),
        checked: true,
        indeterminate: false,
        expanded: !is_placemark,
        geo_keys: Vec::new(),
    });

    if is_placemark {
        let node = &mut nodes[id.index()];
        node.geo_keys = vec![GeoKey::new(&node.name, node.coordinate)];
        return id;
    }

    let mut child_ids = Vec::with_capacity(element.children.len());
    let mut keys = Vec::new();
    let mut seen: AHashSet<GeoKey> = AHashSet::new();
    for child in element.children {
        let child_id = build_into(nodes, child, Some(id));
        child_ids.push(child_id);
        for key in &nodes[child_id.index()].geo_keys {
            if seen.insert(key.clone()) {
                keys.push(key.clone());
            }
        }
    }

    let node = &mut nodes[id.index()];
    node.children = child_ids;
    node.geo_keys = keys;
    id
}
