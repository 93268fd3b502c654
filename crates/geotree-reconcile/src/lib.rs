#![forbid(unsafe_code)]

//! Reconciliation between the feature tree and rendered geometry.
//!
//! # Role in geotree
//! A loaded document is parsed twice by independent code paths: once into
//! the feature tree (`geotree-core`) and once by the external render
//! engine into a flat collection of geometry instances. Neither side
//! carries a stable shared identifier, so correlating them is a matching
//! problem, not a lookup. This crate models it explicitly: a greedy,
//! claim-based bipartite join over `(tree, instances)` — name grouping
//! first, nearest great-circle coordinate as the tie-break, an exact
//! geo-key index as the last-resort fallback.
//!
//! The result is a [`ReconciliationMap`] from geo-keys to instance
//! indices, injective at the instance level. It is rebuilt from scratch
//! per document load; reconciliation is a pure function and needs no
//! engine present, which is what keeps it independently testable.

pub mod map;
pub mod matcher;
pub mod renderable;

pub use map::ReconciliationMap;
pub use matcher::reconcile;
pub use renderable::{GeometryPresence, Renderable};
