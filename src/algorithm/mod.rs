//! Algorithms implemented on engine geometries.

pub mod native;
