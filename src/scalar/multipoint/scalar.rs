use crate::datatypes::CollectionKind;
use crate::scalar::GeometryCollection;

/// A collection of points.
#[derive(Debug)]
pub struct MultiPoint(GeometryCollection);

impl_typed_collection!(MultiPoint, CollectionKind::MultiPoint);
