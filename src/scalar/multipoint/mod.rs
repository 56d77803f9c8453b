mod scalar;

pub use scalar::MultiPoint;
