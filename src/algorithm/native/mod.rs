//! Algorithms implemented natively in this crate rather than delegated to [`geo`].

pub mod eq;
pub mod validate;
