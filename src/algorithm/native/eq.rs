//! Structural equality of engine geometries.
//!
//! Geometries are equal when they have the same kind, the same members in the same order, and
//! the same coordinates. This is not topological equality: a ring starting at a different vertex
//! is a different ring.

use std::fmt::Display;

use crate::datatypes::GeometryKind;
use crate::engine::{Context, CoordSeq, HandleId};

/// The outcome of a structural comparison.
///
/// `Unknown` means the engine could not answer a query about one of the inputs, so neither
/// equality nor inequality was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Equality {
    Equal,
    NotEqual,
    Unknown,
}

impl Equality {
    pub fn is_equal(&self) -> bool {
        matches!(self, Equality::Equal)
    }

    pub fn is_not_equal(&self) -> bool {
        matches!(self, Equality::NotEqual)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Equality::Unknown)
    }

    /// `Some(true)` for `Equal`, `Some(false)` for `NotEqual`, `None` for `Unknown`.
    pub fn to_option(self) -> Option<bool> {
        match self {
            Equality::Equal => Some(true),
            Equality::NotEqual => Some(false),
            Equality::Unknown => None,
        }
    }
}

impl From<bool> for Equality {
    fn from(value: bool) -> Self {
        if value {
            Equality::Equal
        } else {
            Equality::NotEqual
        }
    }
}

impl Display for Equality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Equality::Equal => write!(f, "equal"),
            Equality::NotEqual => write!(f, "not equal"),
            Equality::Unknown => write!(f, "unknown"),
        }
    }
}

/// NaN ordinates compare equal to each other, so that missing Z or M values match.
fn ordinate_eq(left: f64, right: f64) -> bool {
    left == right || (left.is_nan() && right.is_nan())
}

pub fn coord_seq_eq(left: &CoordSeq, right: &CoordSeq, check_z: bool) -> Equality {
    if left.len() != right.len() {
        return Equality::NotEqual;
    }

    for i in 0..left.len() {
        if left.x(i) != right.x(i) || left.y(i) != right.y(i) {
            return Equality::NotEqual;
        }
        if check_z
            && !(ordinate_eq(left.z(i), right.z(i)) && ordinate_eq(left.m(i), right.m(i)))
        {
            return Equality::NotEqual;
        }
    }

    Equality::Equal
}

/// Compares two polygons ring by ring, exterior first.
pub fn polygon_eq(ctx: &Context, left: HandleId, right: HandleId, check_z: bool) -> Equality {
    let (Ok(left), Ok(right)) = (ctx.rings(left), ctx.rings(right)) else {
        return Equality::Unknown;
    };
    if left.len() != right.len() {
        return Equality::NotEqual;
    }

    for (left_ring, right_ring) in left.iter().zip(right.iter()) {
        let result = coord_seq_eq(left_ring, right_ring, check_z);
        if !result.is_equal() {
            return result;
        }
    }

    Equality::Equal
}

/// Compares two geometries of any kind.
pub fn geometries_equal(ctx: &Context, left: HandleId, right: HandleId, check_z: bool) -> Equality {
    let (Ok(left_type), Ok(right_type)) = (ctx.type_id(left), ctx.type_id(right)) else {
        return Equality::Unknown;
    };
    if left_type != right_type {
        return Equality::NotEqual;
    }

    match GeometryKind::try_from(left_type) {
        Ok(GeometryKind::Point | GeometryKind::LineString | GeometryKind::LinearRing) => {
            match (ctx.coord_seq(left), ctx.coord_seq(right)) {
                (Ok(left), Ok(right)) => coord_seq_eq(&left, &right, check_z),
                _ => Equality::Unknown,
            }
        }
        Ok(GeometryKind::Polygon) => polygon_eq(ctx, left, right, check_z),
        Ok(
            GeometryKind::MultiPoint
            | GeometryKind::MultiLineString
            | GeometryKind::MultiPolygon
            | GeometryKind::GeometryCollection,
        ) => collections_equal(ctx, Some(left), Some(right), check_z),
        Err(_) => Equality::Unknown,
    }
}

/// Compares two collections member by member.
///
/// The first member pair that is not `Equal` decides the result. Absent inputs are `Unknown`.
pub fn collections_equal(
    ctx: &Context,
    left: Option<HandleId>,
    right: Option<HandleId>,
    check_z: bool,
) -> Equality {
    let (Some(left), Some(right)) = (left, right) else {
        return Equality::Unknown;
    };
    let (Ok(left_len), Ok(right_len)) = (ctx.num_geometries(left), ctx.num_geometries(right))
    else {
        return Equality::Unknown;
    };
    if left_len != right_len {
        return Equality::NotEqual;
    }

    for i in 0..left_len {
        let (Ok(left_child), Ok(right_child)) = (ctx.geometry_n(left, i), ctx.geometry_n(right, i))
        else {
            return Equality::Unknown;
        };
        let result = geometries_equal(ctx, left_child, right_child, check_z);
        if !result.is_equal() {
            return result;
        }
    }

    Equality::Equal
}
