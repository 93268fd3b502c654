#![forbid(unsafe_code)]

//! Core: the feature tree model and its tri-state toggle engine.
//!
//! # Role in geotree
//! `geotree-core` owns the in-memory representation of one loaded
//! geospatial document: an arena of folder/placemark nodes built from the
//! parser's feature elements, the comparison keys used to correlate those
//! nodes with externally rendered geometry, and the state machine behind
//! the tree's tri-state checkboxes.
//!
//! # Primary responsibilities
//! - **Coord / GeoKey**: coordinate rounding and the opaque comparison key
//!   derived from a feature's name and position.
//! - **FeatureTree**: id-addressed node arena, built once per document and
//!   replaced wholesale on the next load.
//! - **Toggle engine**: downward check cascades, upward indeterminate
//!   recomputation, and effective-checked queries.
//! - **Control rows**: the flattened, filterable view the presentation
//!   layer renders as checkbox rows.
//!
//! # How it fits in the system
//! `geotree-reconcile` joins this crate's placemark leaves to the render
//! engine's geometry instances; `geotree-session` drives both and projects
//! toggle state onto instance visibility.

pub mod element;
pub mod geo;
pub mod persist;
pub mod rows;
pub mod toggle;
pub mod tree;

pub use element::{FeatureElement, FeatureKind};
pub use geo::{Coord, GeoKey};
pub use persist::ToggleState;
pub use rows::{TreeRow, visible_rows};
pub use tree::{FeatureNode, FeatureTree, NodeId};
