#![forbid(unsafe_code)]

//! Parser-facing input model.
//!
//! The external document parser hands the tree builder one
//! [`FeatureElement`] per folder, document root, or placemark. Structural
//! wrappers that are neither (a document envelope, for instance) are
//! presented by parser adapters as plain folders.

use crate::geo::Coord;

/// Structural kind of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// A container grouping placemarks and/or nested folders.
    Folder,
    /// A leaf feature with a name and geometry.
    Placemark,
}

/// One parsed feature element: a folder or a placemark.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureElement {
    /// Structural kind.
    pub kind: FeatureKind,
    /// Display name, if the source document carried one.
    pub name: Option<String>,
    /// Structural tag of the source element, used as the name fallback.
    pub tag: String,
    /// First vertex of any geometry, when one parsed. Placemarks only.
    pub coordinate: Option<Coord>,
    /// Ordered child elements (document order). Empty for placemarks.
    pub children: Vec<FeatureElement>,
}

impl FeatureElement {
    /// Create a named folder element.
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            kind: FeatureKind::Folder,
            name: Some(name.into()),
            tag: "Folder".to_owned(),
            coordinate: None,
            children: Vec::new(),
        }
    }

    /// Create a named placemark element with an optional first vertex.
    #[must_use]
    pub fn placemark(name: impl Into<String>, coordinate: Option<Coord>) -> Self {
        Self {
            kind: FeatureKind::Placemark,
            name: Some(name.into()),
            tag: "Placemark".to_owned(),
            coordinate,
            children: Vec::new(),
        }
    }

    /// Drop the display name, leaving only the structural tag.
    #[must_use]
    pub fn unnamed(mut self) -> Self {
        self.name = None;
        self
    }

    /// Override the structural tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Add a child element.
    #[must_use]
    pub fn child(mut self, element: FeatureElement) -> Self {
        self.children.push(element);
        self
    }

    /// Set children from a vec.
    #[must_use]
    pub fn with_children(mut self, elements: Vec<FeatureElement>) -> Self {
        self.children = elements;
        self
    }
}
