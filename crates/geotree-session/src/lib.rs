#![forbid(unsafe_code)]

//! Session: document lifecycle, visibility projection, and UI intents.
//!
//! # Role in geotree
//! `geotree-session` ties the core model and the reconciler to the two
//! external collaborators — the document parser and the render engine —
//! behind trait seams. One [`DocumentSession`] value owns everything a
//! loaded document needs (tree, reconciliation map, engine collection,
//! interaction flags); a new load replaces it wholesale, so there is no
//! ambient global state and no partial old/new mixing to observe.
//!
//! # Primary responsibilities
//! - **Load pipeline**: parse → build tree → engine load → retire the
//!   previous collection (best-effort) → attach → reconcile → project.
//! - **Visibility projection**: derive show/hide from toggle state and
//!   the reconciliation map, with the mandatory fail-open branches.
//! - **UI intents**: expand/check toggles, bulk operations, and the
//!   filterable control-row snapshot the presentation layer renders.

pub mod error;
pub mod project;
pub mod seams;
pub mod session;

pub use error::{EngineError, Error, ParseError, Result};
pub use project::apply_visibility;
pub use seams::{DocumentParser, RenderCollection, RenderEngine};
pub use session::DocumentSession;
