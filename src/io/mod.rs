//! Conversion of caller-supplied values into engine geometries.

mod element;
pub mod geo;

pub use element::Element;
