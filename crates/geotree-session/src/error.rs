#![forbid(unsafe_code)]

//! Session error model.
//!
//! # Design principles
//!
//! 1. **Fatal means untouched** — a load that fails leaves the previous
//!    document's tree, mapping, and view state exactly as they were.
//! 2. **Domain-specific errors** — the parse and engine seams each have a
//!    typed error so callers can match on what matters.
//! 3. **One human-readable message** — every variant formats to a single
//!    sentence fit for surfacing directly to a user.
//!
//! Non-fatal conditions — a missing coordinate, an unmatched placemark, a
//! failed detach of a previous collection — are not errors at all: they
//! are absorbed where they occur and never propagate.

use std::fmt;

// ── Domain-Specific Error Types ─────────────────────────────────────────

/// Document parsing errors. Fatal to the load.
#[derive(Debug)]
pub enum ParseError {
    /// The document text is malformed.
    Malformed(String),
    /// The document parsed but holds no folder or placemark root.
    NoFeatures,
}

/// Render engine errors. Fatal to the load.
#[derive(Debug)]
pub enum EngineError {
    /// The engine rejected the document content.
    LoadRejected(String),
    /// Removing a previously attached collection failed.
    ///
    /// The session swallows this during retirement; it only surfaces when
    /// a caller drives the engine seam directly.
    DetachFailed(String),
}

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for session operations.
#[derive(Debug)]
pub enum Error {
    /// Document parsing failure.
    Parse(ParseError),
    /// Render engine failure.
    Engine(EngineError),
}

/// Standard result type for session APIs.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Error type label for tracing fields and metric counters.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Engine(_) => "engine",
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "document parse failed: {msg}"),
            Self::NoFeatures => {
                write!(f, "document contains no folder or placemark features")
            }
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadRejected(msg) => write!(f, "render engine rejected document: {msg}"),
            Self::DetachFailed(msg) => write!(f, "failed to remove previous collection: {msg}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for ParseError {}
impl std::error::Error for EngineError {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Engine(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
