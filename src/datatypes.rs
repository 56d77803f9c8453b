//! Geometry kinds and coordinate dimensions.

use std::fmt::Display;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// The kind of a single geometry stored in the engine.
///
/// The integer values match the type ids of GEOS and Shapely:
///
/// - POINT is 0
/// - LINESTRING is 1
/// - LINEARRING is 2
/// - POLYGON is 3
/// - MULTIPOINT is 4
/// - MULTILINESTRING is 5
/// - MULTIPOLYGON is 6
/// - GEOMETRYCOLLECTION is 7
///
/// Any other type id reported by an engine does not convert into a [`GeometryKind`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum GeometryKind {
    Point = 0,
    LineString = 1,
    LinearRing = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryKind {
    /// Whether geometries of this kind own child geometries.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            GeometryKind::MultiPoint
                | GeometryKind::MultiLineString
                | GeometryKind::MultiPolygon
                | GeometryKind::GeometryCollection
        )
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "Point"),
            GeometryKind::LineString => write!(f, "LineString"),
            GeometryKind::LinearRing => write!(f, "LinearRing"),
            GeometryKind::Polygon => write!(f, "Polygon"),
            GeometryKind::MultiPoint => write!(f, "MultiPoint"),
            GeometryKind::MultiLineString => write!(f, "MultiLineString"),
            GeometryKind::MultiPolygon => write!(f, "MultiPolygon"),
            GeometryKind::GeometryCollection => write!(f, "GeometryCollection"),
        }
    }
}

/// The four kinds of geometry collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    GeometryCollection,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl CollectionKind {
    /// The kind every member of this collection must have, if constrained.
    pub fn element_kind(&self) -> Option<GeometryKind> {
        match self {
            CollectionKind::GeometryCollection => None,
            CollectionKind::MultiPoint => Some(GeometryKind::Point),
            CollectionKind::MultiLineString => Some(GeometryKind::LineString),
            CollectionKind::MultiPolygon => Some(GeometryKind::Polygon),
        }
    }

    /// Whether a geometry of `kind` may be a direct member of this collection.
    pub fn accepts(&self, kind: GeometryKind) -> bool {
        self.element_kind().map_or(true, |expected| expected == kind)
    }
}

impl From<CollectionKind> for GeometryKind {
    fn from(value: CollectionKind) -> Self {
        match value {
            CollectionKind::GeometryCollection => GeometryKind::GeometryCollection,
            CollectionKind::MultiPoint => GeometryKind::MultiPoint,
            CollectionKind::MultiLineString => GeometryKind::MultiLineString,
            CollectionKind::MultiPolygon => GeometryKind::MultiPolygon,
        }
    }
}

impl TryFrom<GeometryKind> for CollectionKind {
    type Error = EngineError;

    fn try_from(value: GeometryKind) -> std::result::Result<Self, Self::Error> {
        match value {
            GeometryKind::GeometryCollection => Ok(CollectionKind::GeometryCollection),
            GeometryKind::MultiPoint => Ok(CollectionKind::MultiPoint),
            GeometryKind::MultiLineString => Ok(CollectionKind::MultiLineString),
            GeometryKind::MultiPolygon => Ok(CollectionKind::MultiPolygon),
            other => Err(EngineError::IncorrectGeometryType(format!(
                "{other} is not a collection"
            ))),
        }
    }
}

impl Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        GeometryKind::from(*self).fmt(f)
    }
}

/// The dimension of stored coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// Two-dimensional.
    #[default]
    XY,

    /// Three-dimensional.
    XYZ,

    /// XYM (2D with measure).
    XYM,

    /// XYZM (3D with measure).
    XYZM,
}

impl Dimension {
    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimension::XY,
            (true, false) => Dimension::XYZ,
            (false, true) => Dimension::XYM,
            (true, true) => Dimension::XYZM,
        }
    }

    /// Returns the number of ordinates per coordinate.
    pub fn size(&self) -> usize {
        match self {
            Dimension::XY => 2,
            Dimension::XYZ => 3,
            Dimension::XYM => 3,
            Dimension::XYZM => 4,
        }
    }

    pub fn has_z(&self) -> bool {
        matches!(self, Dimension::XYZ | Dimension::XYZM)
    }

    pub fn has_m(&self) -> bool {
        matches!(self, Dimension::XYM | Dimension::XYZM)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::XY => write!(f, "XY"),
            Dimension::XYZ => write!(f, "XYZ"),
            Dimension::XYM => write!(f, "XYM"),
            Dimension::XYZM => write!(f, "XYZM"),
        }
    }
}
