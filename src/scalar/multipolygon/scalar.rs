use crate::datatypes::CollectionKind;
use crate::error::Result;
use crate::scalar::{Geometry, GeometryCollection};

/// A collection of polygons.
///
/// Unless the factory disables validation, members never overlap and their boundaries only touch
/// at points.
#[derive(Debug)]
pub struct MultiPolygon(GeometryCollection);

impl_typed_collection!(MultiPolygon, CollectionKind::MultiPolygon);

impl MultiPolygon {
    /// The summed planar area of every member.
    pub fn area(&self) -> Result<f64> {
        let geom = self.0.as_geometry();
        Ok(geom.factory().context().area(geom.handle_id())?)
    }

    /// The centroid as a new point. An empty MultiPolygon yields an empty point.
    pub fn centroid(&self) -> Result<Geometry> {
        let geom = self.0.as_geometry();
        let handle = geom.factory().context().centroid(geom.handle_id())?;
        Geometry::wrap(geom.factory(), handle, None)
    }

    /// A point guaranteed to lie inside one of the members.
    pub fn point_on_surface(&self) -> Result<Geometry> {
        let geom = self.0.as_geometry();
        let handle = geom.factory().context().point_on_surface(geom.handle_id())?;
        Geometry::wrap(geom.factory(), handle, None)
    }
}
