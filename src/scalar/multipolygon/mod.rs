mod scalar;

pub use scalar::MultiPolygon;
