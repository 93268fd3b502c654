#![forbid(unsafe_code)]

//! The document session.
//!
//! One [`DocumentSession`] value owns the parser, the engine, and the
//! state of the currently loaded document. Tree mutation and visibility
//! projection run synchronously inside each intent; the load pipeline is
//! the only long-running operation, and a second load started while one
//! is in flight must be serialized or rejected by the caller — the
//! session does not guard re-entrancy itself.

use geotree_core::{FeatureTree, NodeId, TreeRow, visible_rows};
use geotree_reconcile::{ReconciliationMap, reconcile};
use web_time::Instant;

use crate::error::{Error, Result};
use crate::project::apply_visibility;
use crate::seams::{DocumentParser, RenderCollection, RenderEngine};

/// Everything owned by one loaded document, replaced wholesale per load.
struct LoadedDocument<C> {
    tree: FeatureTree,
    map: ReconciliationMap,
    collection: C,
    /// True once the user has changed any checked state.
    interacted: bool,
    /// Control-row filter; never affects geometry visibility.
    filter: String,
}

/// Session over one loaded document at a time.
pub struct DocumentSession<P, E: RenderEngine> {
    parser: P,
    engine: E,
    hide_labels: bool,
    document: Option<LoadedDocument<E::Collection>>,
}

impl<P: DocumentParser, E: RenderEngine> DocumentSession<P, E> {
    /// Create a session with no document loaded.
    pub fn new(parser: P, engine: E) -> Self {
        Self {
            parser,
            engine,
            hide_labels: false,
            document: None,
        }
    }

    /// Load a document, replacing any previous one.
    ///
    /// Staged: parse, build the tree, hand the content to the engine,
    /// retire the previous collection best-effort, attach and fit the new
    /// one, reconcile, project. Fatal errors abort before any state is
    /// replaced — on `Err` the previous document (if any) is intact and
    /// still attached.
    pub fn load_document(&mut self, content: &str) -> Result<()> {
        let start = Instant::now();

        let element = self.parser.parse(content).map_err(|err| {
            tracing::error!(message = "session.load_failed", stage = "parse", error = %err);
            Error::Parse(err)
        })?;
        let tree = FeatureTree::build(element);

        let collection = self.engine.load(content).map_err(|err| {
            tracing::error!(message = "session.load_failed", stage = "engine", error = %err);
            Error::Engine(err)
        })?;

        // Retire the old collection; a failed removal must not abort the
        // new load.
        if let Some(previous) = self.document.take()
            && let Err(err) = self.engine.detach(&previous.collection)
        {
            tracing::warn!(message = "session.detach_failed", error = %err);
        }

        self.engine.attach(&collection);
        self.engine.fit_view(&collection);

        let map = reconcile(&tree, collection.instances());
        tracing::info!(
            message = "session.loaded",
            nodes = tree.len(),
            placemarks = tree.placemark_count(),
            instances = collection.instances().len(),
            matched_keys = map.key_count(),
            duration_us = start.elapsed().as_micros() as u64,
        );

        self.document = Some(LoadedDocument {
            tree,
            map,
            collection,
            interacted: false,
            filter: String::new(),
        });
        self.refresh_visibility();
        Ok(())
    }

    /// Whether a document is currently loaded.
    #[must_use]
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Read-only view of the current tree.
    #[must_use]
    pub fn tree(&self) -> Option<&FeatureTree> {
        self.document.as_ref().map(|doc| &doc.tree)
    }

    /// The current engine collection.
    #[must_use]
    pub fn collection(&self) -> Option<&E::Collection> {
        self.document.as_ref().map(|doc| &doc.collection)
    }

    /// The engine, for host-driven camera or capability calls.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable engine access.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Whether the user has toggled any checked state this document.
    #[must_use]
    pub fn interacted(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| doc.interacted)
    }

    /// Flattened, filtered control rows for the presentation layer.
    #[must_use]
    pub fn control_rows(&self) -> Vec<TreeRow<'_>> {
        self.document
            .as_ref()
            .map(|doc| visible_rows(&doc.tree, &doc.filter))
            .unwrap_or_default()
    }

    /// Flip one node's expansion. Leaves are a no-op.
    pub fn toggle_expand(&mut self, id: NodeId) {
        if let Some(doc) = self.document.as_mut() {
            doc.tree.toggle_expanded(id);
        }
    }

    /// Set a node's checked state, cascading down and reclassifying up.
    ///
    /// Marks the session interacted and reprojects visibility.
    pub fn toggle_checked(&mut self, id: NodeId, value: bool) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        doc.tree.set_checked_recursive(id, value);
        if let Some(parent) = doc.tree.get(id).and_then(|node| node.parent()) {
            doc.tree.recompute_indeterminate_up(parent);
        }
        doc.interacted = true;
        self.refresh_visibility();
    }

    /// Set the control-row filter text.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        if let Some(doc) = self.document.as_mut() {
            doc.filter = text.into();
        }
    }

    /// Current control-row filter text.
    #[must_use]
    pub fn filter_text(&self) -> &str {
        self.document.as_ref().map_or("", |doc| doc.filter.as_str())
    }

    /// Check every node.
    pub fn check_all(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            doc.tree.check_all();
            doc.interacted = true;
        }
        self.refresh_visibility();
    }

    /// Uncheck everything; the root stays rendered as mixed.
    pub fn uncheck_all(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            doc.tree.uncheck_all();
            doc.interacted = true;
        }
        self.refresh_visibility();
    }

    /// Expand every folder.
    pub fn expand_all(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            doc.tree.expand_all();
        }
    }

    /// Collapse every folder, re-expanding the root for navigability.
    pub fn collapse_all(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            doc.tree.collapse_all();
        }
    }

    /// Hide or show labels and markers on every instance.
    pub fn set_hide_labels(&mut self, hide: bool) {
        self.hide_labels = hide;
        self.refresh_visibility();
    }

    /// Whether labels and markers are hidden.
    #[must_use]
    pub fn hide_labels(&self) -> bool {
        self.hide_labels
    }

    /// Recompute and apply visibility to the current collection.
    ///
    /// Rebuilds the reconciliation map first when it is empty, so a load
    /// that raced the engine's collection can still converge on the next
    /// projection.
    pub fn refresh_visibility(&mut self) {
        let hide_labels = self.hide_labels;
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        if doc.map.is_empty() {
            doc.map = reconcile(&doc.tree, doc.collection.instances());
        }
        apply_visibility(
            &doc.tree,
            &doc.map,
            doc.interacted,
            hide_labels,
            doc.collection.instances_mut(),
        );
    }
}
