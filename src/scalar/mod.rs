//! Caller-facing geometries and collections.

pub use geometry::{Geometry, Subtype};
pub use geometrycollection::{GeometryCollection, GeometryCollectionIterator};
pub use multilinestring::MultiLineString;
pub use multipoint::MultiPoint;
pub use multipolygon::MultiPolygon;

/// Implements the shared surface of a collection restricted to one member kind.
macro_rules! impl_typed_collection {
    ($name:ident, $kind:expr) => {
        impl $name {
            /// Builds the collection from `elements`, all of which must have the member kind.
            pub fn try_new<'a, E: Into<$crate::io::Element<'a>>>(
                factory: &$crate::factory::Factory,
                elements: impl IntoIterator<Item = E>,
            ) -> $crate::error::Result<Self> {
                Ok(Self($crate::scalar::GeometryCollection::try_new(
                    factory, $kind, elements,
                )?))
            }

            pub fn eql(&self, other: &$name) -> $crate::algorithm::native::eq::Equality {
                self.0.eql(&other.0)
            }

            pub fn try_clone(&self) -> $crate::error::Result<Self> {
                Ok(Self(self.0.try_clone()?))
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::scalar::GeometryCollection;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$name> for $crate::scalar::GeometryCollection {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<$crate::scalar::GeometryCollection> for $name {
            type Error = $crate::error::GeoCollectionError;

            fn try_from(value: $crate::scalar::GeometryCollection) -> $crate::error::Result<Self> {
                if value.geometry_type() != $kind {
                    return Err($crate::error::GeoCollectionError::IncorrectGeometryType(
                        format!("expected a {}, found a {}", $kind, value.geometry_type()),
                    ));
                }
                Ok(Self(value))
            }
        }
    };
}

pub mod geometry;
pub mod geometrycollection;
pub mod multilinestring;
pub mod multipoint;
pub mod multipolygon;
