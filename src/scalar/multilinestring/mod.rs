mod scalar;

pub use scalar::MultiLineString;
