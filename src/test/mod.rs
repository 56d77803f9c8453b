pub(crate) mod point;
