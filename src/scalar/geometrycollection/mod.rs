pub mod builder;
mod iterator;
mod scalar;

pub use iterator::GeometryCollectionIterator;
pub use scalar::GeometryCollection;
