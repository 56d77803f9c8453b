use crate::datatypes::GeometryKind;
use crate::engine::{EngineError, Handle};
use crate::error::{ElementError, Result};
use crate::factory::Factory;
use crate::io::geo::geometry_from_geo;
use crate::scalar::{
    Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Subtype,
};

/// A value that can become a member of a collection.
#[derive(Debug)]
pub enum Element<'a> {
    /// An owned geometry, moved into the collection.
    Geometry(Geometry),
    /// A borrowed geometry, copied into the collection.
    Ref(&'a Geometry),
    /// A [`geo`] geometry, imported into the collection's context.
    Geo(geo::Geometry),
}

impl<'a> Element<'a> {
    /// Converts the element into an unowned handle in `factory`'s context.
    ///
    /// When `expected` is set the element must have that kind. A linear ring is accepted where a
    /// line string is expected, and is stored as a line string tagged [`Subtype::LinearRing`].
    pub fn into_detached(
        self,
        factory: &Factory,
        expected: Option<GeometryKind>,
    ) -> std::result::Result<(Handle, Option<Subtype>), ElementError> {
        let ctx = factory.context();
        let (handle, subtype) = match self {
            Element::Geometry(geom) => {
                let (source, handle, subtype) = geom.into_parts();
                if ctx.same_context(source.context()) {
                    if ctx.is_owned(handle.id())? {
                        return Err(EngineError::AlreadyOwned(handle.id()).into());
                    }
                    (handle, subtype)
                } else {
                    (ctx.copy_from(source.context(), handle.id())?, subtype)
                }
            }
            Element::Ref(geom) => (
                ctx.copy_from(geom.factory().context(), geom.handle_id())?,
                geom.subtype(),
            ),
            Element::Geo(geom) => geometry_from_geo(factory, &geom)?,
        };

        let found = ctx.kind(handle.id())?;
        match expected {
            None => Ok((handle, subtype)),
            Some(expected) if expected == found => Ok((handle, subtype)),
            Some(GeometryKind::LineString) if found == GeometryKind::LinearRing => {
                let line_string = ctx.create_line_string(ctx.coord_seq(handle.id())?);
                Ok((line_string, subtype.or(Some(Subtype::LinearRing))))
            }
            Some(expected) => Err(ElementError::KindMismatch { expected, found }),
        }
    }

    /// Converts the element into a standalone [`Geometry`].
    pub fn into_geometry(self, factory: &Factory) -> Result<Geometry> {
        let (handle, subtype) = self.into_detached(factory, None)?;
        Geometry::wrap(factory, handle, subtype)
    }
}

impl From<Geometry> for Element<'_> {
    fn from(value: Geometry) -> Self {
        Element::Geometry(value)
    }
}

impl<'a> From<&'a Geometry> for Element<'a> {
    fn from(value: &'a Geometry) -> Self {
        Element::Ref(value)
    }
}

impl From<geo::Geometry> for Element<'_> {
    fn from(value: geo::Geometry) -> Self {
        Element::Geo(value)
    }
}

macro_rules! impl_from_collection {
    ($collection:ty) => {
        impl From<$collection> for Element<'_> {
            fn from(value: $collection) -> Self {
                Element::Geometry(GeometryCollection::from(value).into_geometry())
            }
        }

        impl<'a> From<&'a $collection> for Element<'a> {
            fn from(value: &'a $collection) -> Self {
                Element::Ref(value.as_geometry())
            }
        }
    };
}

impl_from_collection!(GeometryCollection);
impl_from_collection!(MultiPoint);
impl_from_collection!(MultiLineString);
impl_from_collection!(MultiPolygon);

macro_rules! impl_from_geo {
    ($($geo_type:ident),+) => {
        $(
            impl From<geo::$geo_type> for Element<'_> {
                fn from(value: geo::$geo_type) -> Self {
                    Element::Geo(geo::Geometry::$geo_type(value))
                }
            }
        )+
    };
}

impl_from_geo!(
    Point,
    Line,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Rect,
    Triangle
);
