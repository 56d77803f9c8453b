//! Convert from [`geo`] geometries.

mod scalar;

pub(crate) use scalar::geometry_from_geo;
pub use scalar::{line_string_seq, polygon_rings};
