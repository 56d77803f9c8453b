use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A narrower or alternate representation of a stored geometry.
///
/// The engine only knows line strings and polygons. A tag records that a member was created from
/// a more specific shape so that it can be handed back with the same meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subtype {
    /// A two-point line string.
    Line,
    /// A closed ring stored as a line string.
    LinearRing,
    /// An axis-aligned rectangle stored as a polygon.
    Rect,
    /// A triangle stored as a polygon.
    Triangle,
}

impl Display for Subtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subtype::Line => write!(f, "Line"),
            Subtype::LinearRing => write!(f, "LinearRing"),
            Subtype::Rect => write!(f, "Rect"),
            Subtype::Triangle => write!(f, "Triangle"),
        }
    }
}
