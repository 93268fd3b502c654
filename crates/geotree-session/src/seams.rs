#![forbid(unsafe_code)]

//! Trait seams for the two external collaborators.
//!
//! The session never parses document text and never draws: the parser and
//! the render engine live behind these traits, which is what lets every
//! algorithm in this workspace run under test with plain fakes.

use geotree_core::FeatureElement;
use geotree_reconcile::Renderable;

use crate::error::{EngineError, ParseError};

/// The external document parser.
pub trait DocumentParser {
    /// Parse raw document text into a feature element tree.
    ///
    /// Structural wrappers that are neither folder nor placemark must be
    /// presented as folders; a document with no recognizable feature root
    /// is [`ParseError::NoFeatures`].
    fn parse(&self, content: &str) -> std::result::Result<FeatureElement, ParseError>;
}

/// A collection of renderable instances produced by one engine load.
pub trait RenderCollection {
    /// The engine's instance handle type.
    type Instance: Renderable;

    /// The instances, in the engine's stable collection order.
    fn instances(&self) -> &[Self::Instance];

    /// Mutable access for visibility projection.
    fn instances_mut(&mut self) -> &mut [Self::Instance];
}

/// The external render engine.
pub trait RenderEngine {
    /// The collection type one load produces.
    type Collection: RenderCollection;

    /// Parse raw content into a fresh collection of instances.
    ///
    /// This is the load pipeline's only suspension point; the session
    /// imposes no timeout of its own.
    fn load(&mut self, content: &str) -> std::result::Result<Self::Collection, EngineError>;

    /// Add a loaded collection to the active view.
    fn attach(&mut self, collection: &Self::Collection);

    /// Remove a previously attached collection.
    ///
    /// Must tolerate a collection that was already removed or never
    /// attached. The session treats any error as best-effort noise during
    /// retirement and continues the load.
    fn detach(&mut self, collection: &Self::Collection) -> std::result::Result<(), EngineError>;

    /// Best-effort viewport fit to the collection's extent.
    fn fit_view(&mut self, collection: &Self::Collection);
}
