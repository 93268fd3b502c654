#![forbid(unsafe_code)]

//! The render-engine instance seam.

use geotree_core::Coord;

/// What geometry, if any, an instance carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryPresence {
    /// No geometry; the instance never participates in matching.
    #[default]
    None,
    /// A point.
    Point,
    /// A line string.
    Line,
    /// A polygon.
    Polygon,
}

impl GeometryPresence {
    /// Whether any geometry is present.
    #[must_use]
    pub const fn carries_geometry(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One renderable geometry object owned by the external engine.
///
/// This core never creates or destroys instances; it reads their
/// attributes during reconciliation and writes the visibility flags
/// during projection. The three flags are independent: hiding labels
/// must not touch `visible` and vice versa.
pub trait Renderable {
    /// Display name; possibly empty.
    fn name(&self) -> &str;

    /// Geometry attached to this instance.
    fn geometry(&self) -> GeometryPresence;

    /// Representative coordinate (first vertex), when the engine exposes
    /// one.
    fn position(&self) -> Option<Coord>;

    /// Show or hide the instance's geometry.
    fn set_visible(&mut self, visible: bool);

    /// Show or hide the instance's label.
    fn set_label_visible(&mut self, visible: bool);

    /// Show or hide the instance's marker billboard.
    fn set_marker_visible(&mut self, visible: bool);
}
