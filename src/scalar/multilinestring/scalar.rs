use crate::datatypes::CollectionKind;
use crate::error::Result;
use crate::scalar::GeometryCollection;

/// A collection of line strings.
#[derive(Debug)]
pub struct MultiLineString(GeometryCollection);

impl_typed_collection!(MultiLineString, CollectionKind::MultiLineString);

impl MultiLineString {
    /// The summed planar length of every member.
    pub fn length(&self) -> Result<f64> {
        let geom = self.0.as_geometry();
        Ok(geom.factory().context().length(geom.handle_id())?)
    }

    /// Whether every member starts where it ends. An empty collection is closed.
    pub fn is_closed(&self) -> Result<bool> {
        let geom = self.0.as_geometry();
        let ctx = geom.factory().context();
        for i in 0..ctx.num_geometries(geom.handle_id())? {
            let member = ctx.geometry_n(geom.handle_id(), i)?;
            if !ctx.is_closed(member)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
