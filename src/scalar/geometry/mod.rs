mod scalar;
mod subtype;

pub use scalar::Geometry;
pub use subtype::Subtype;
