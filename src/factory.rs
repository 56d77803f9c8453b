//! The [`Factory`] through which geometries and collections are created.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::datatypes::{CollectionKind, Dimension};
use crate::engine::{Context, Coord, CoordSeq};
use crate::error::Result;
use crate::io::Element;
use crate::scalar::geometrycollection::builder::create_collection;
use crate::scalar::{
    Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Subtype,
};

/// Options shared by every geometry created through a [`Factory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Reject MultiPolygons whose members overlap or share boundary lines.
    pub validate_multi_polygons: bool,

    /// Store a Z ordinate for every coordinate.
    pub has_z: bool,

    /// Store an M ordinate for every coordinate.
    pub has_m: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            validate_multi_polygons: true,
            has_z: false,
            has_m: false,
        }
    }
}

impl FactoryConfig {
    /// Parses a config from JSON. Missing fields take their default value.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn dimension(&self) -> Dimension {
        Dimension::from_flags(self.has_z, self.has_m)
    }

    /// Whether structural equality also compares Z and M ordinates.
    pub fn checks_z(&self) -> bool {
        self.has_z || self.has_m
    }
}

/// An engine context paired with a [`FactoryConfig`].
///
/// Cloning a factory is cheap. Two factories are equal when they share the same engine context
/// and have equal configs.
#[derive(Debug, Clone, Default)]
pub struct Factory {
    context: Context,
    config: Rc<FactoryConfig>,
}

impl PartialEq for Factory {
    fn eq(&self, other: &Self) -> bool {
        self.context.same_context(&other.context) && self.config == other.config
    }
}

impl Factory {
    /// Creates a factory with a new engine context.
    pub fn new(config: FactoryConfig) -> Self {
        Self::with_context(Context::new(), config)
    }

    /// Creates a factory that stores its geometries in an existing context.
    pub fn with_context(context: Context, config: FactoryConfig) -> Self {
        Self {
            context,
            config: Rc::new(config),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn dimension(&self) -> Dimension {
        self.config.dimension()
    }

    fn seq(&self, coords: impl IntoIterator<Item = impl Into<Coord>>) -> CoordSeq {
        CoordSeq::from_coords(self.dimension(), coords)
    }

    fn ring(&self, coords: impl IntoIterator<Item = impl Into<Coord>>) -> CoordSeq {
        let mut ring = self.seq(coords);
        ring.close();
        ring
    }

    pub fn point(&self, coord: impl Into<Coord>) -> Result<Geometry> {
        let handle = self.context.create_point(self.seq([coord]))?;
        Geometry::wrap(self, handle, None)
    }

    pub fn empty_point(&self) -> Result<Geometry> {
        let handle = self.context.create_point(CoordSeq::new(self.dimension()))?;
        Geometry::wrap(self, handle, None)
    }

    pub fn line_string(
        &self,
        coords: impl IntoIterator<Item = impl Into<Coord>>,
    ) -> Result<Geometry> {
        let handle = self.context.create_line_string(self.seq(coords));
        Geometry::wrap(self, handle, None)
    }

    /// A two-point line string tagged [`Subtype::Line`].
    pub fn line(&self, start: impl Into<Coord>, end: impl Into<Coord>) -> Result<Geometry> {
        let seq = self.seq([start.into(), end.into()]);
        let handle = self.context.create_line_string(seq);
        Geometry::wrap(self, handle, Some(Subtype::Line))
    }

    /// A linear ring. The ring is closed if its last coordinate differs from its first.
    pub fn linear_ring(
        &self,
        coords: impl IntoIterator<Item = impl Into<Coord>>,
    ) -> Result<Geometry> {
        let handle = self.context.create_linear_ring(self.ring(coords));
        Geometry::wrap(self, handle, None)
    }

    /// A polygon from an exterior ring and any number of holes. Rings are closed as needed.
    pub fn polygon<C: Into<Coord>>(
        &self,
        exterior: impl IntoIterator<Item = C>,
        interiors: impl IntoIterator<Item = Vec<C>>,
    ) -> Result<Geometry> {
        let rings = std::iter::once(self.ring(exterior))
            .chain(interiors.into_iter().map(|interior| self.ring(interior)))
            .collect();
        let handle = self.context.create_polygon(rings);
        Geometry::wrap(self, handle, None)
    }

    /// An axis-aligned rectangle stored as a polygon tagged [`Subtype::Rect`].
    pub fn rect(&self, min: impl Into<Coord>, max: impl Into<Coord>) -> Result<Geometry> {
        let (min, max): (Coord, Coord) = (min.into(), max.into());
        let rect = geo::Rect::new(geo::Coord::from(min), geo::Coord::from(max));
        let ring = self.ring(rect.to_polygon().exterior().coords().copied());
        let handle = self.context.create_polygon(vec![ring]);
        Geometry::wrap(self, handle, Some(Subtype::Rect))
    }

    /// A triangle stored as a polygon tagged [`Subtype::Triangle`].
    pub fn triangle(
        &self,
        a: impl Into<Coord>,
        b: impl Into<Coord>,
        c: impl Into<Coord>,
    ) -> Result<Geometry> {
        let ring = self.ring([a.into(), b.into(), c.into()]);
        let handle = self.context.create_polygon(vec![ring]);
        Geometry::wrap(self, handle, Some(Subtype::Triangle))
    }

    /// Copies a [`geo`] geometry into this factory's context.
    pub fn import(&self, geom: &geo::Geometry) -> Result<Geometry> {
        Element::Geo(geom.clone()).into_geometry(self)
    }

    pub fn collection<'a, E: Into<Element<'a>>>(
        &self,
        elements: impl IntoIterator<Item = E>,
    ) -> Result<GeometryCollection> {
        create_collection(
            self,
            CollectionKind::GeometryCollection,
            elements.into_iter().map(Into::into),
        )
    }

    pub fn multi_point<'a, E: Into<Element<'a>>>(
        &self,
        elements: impl IntoIterator<Item = E>,
    ) -> Result<MultiPoint> {
        MultiPoint::try_new(self, elements)
    }

    pub fn multi_line_string<'a, E: Into<Element<'a>>>(
        &self,
        elements: impl IntoIterator<Item = E>,
    ) -> Result<MultiLineString> {
        MultiLineString::try_new(self, elements)
    }

    pub fn multi_polygon<'a, E: Into<Element<'a>>>(
        &self,
        elements: impl IntoIterator<Item = E>,
    ) -> Result<MultiPolygon> {
        MultiPolygon::try_new(self, elements)
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;
    use crate::datatypes::GeometryKind;
    use crate::error::GeoCollectionError;

    #[test]
    fn config_from_json() {
        let config = FactoryConfig::from_json(r#"{"has_z": true}"#).unwrap();
        assert!(config.validate_multi_polygons);
        assert_eq!(config.dimension(), Dimension::XYZ);
        assert!(config.checks_z());

        let config = FactoryConfig::from_json(r#"{"validate_multi_polygons": false}"#).unwrap();
        assert!(!config.validate_multi_polygons);
        assert_eq!(config.dimension(), Dimension::XY);

        assert_matches!(
            FactoryConfig::from_json("{"),
            Err(GeoCollectionError::Config(_))
        );
    }

    #[test]
    fn factory_equality() {
        let factory = Factory::default();
        assert_eq!(factory, factory.clone());
        assert_ne!(factory, Factory::default());

        let lenient = Factory::with_context(
            factory.context().clone(),
            FactoryConfig {
                validate_multi_polygons: false,
                ..Default::default()
            },
        );
        assert_ne!(factory, lenient);
    }

    #[test]
    fn constructors_tag_subtypes() {
        let factory = Factory::default();
        let line = factory.line((0., 0.), (1., 1.)).unwrap();
        assert_eq!(line.kind(), GeometryKind::LineString);
        assert_eq!(line.subtype(), Some(Subtype::Line));

        let rect = factory.rect((0., 0.), (2., 1.)).unwrap();
        assert_eq!(rect.kind(), GeometryKind::Polygon);
        assert_eq!(rect.subtype(), Some(Subtype::Rect));

        let triangle = factory.triangle((0., 0.), (1., 0.), (0., 1.)).unwrap();
        assert_eq!(triangle.subtype(), Some(Subtype::Triangle));

        let point = factory.point((0., 0.)).unwrap();
        assert_eq!(point.subtype(), None);
    }

    #[test]
    fn rings_are_closed() {
        let factory = Factory::default();
        let ring = factory
            .linear_ring([(0., 0.), (1., 0.), (1., 1.)])
            .unwrap();
        assert_eq!(ring.kind(), GeometryKind::LinearRing);
        let seq = factory.context().coord_seq(ring.handle_id()).unwrap();
        assert_eq!(seq.len(), 4);
        assert!(seq.is_closed());

        let polygon = factory
            .polygon(
                [(0., 0.), (4., 0.), (4., 4.), (0., 4.)],
                [vec![(1., 1.), (2., 1.), (2., 2.)]],
            )
            .unwrap();
        let rings = factory.context().rings(polygon.handle_id()).unwrap();
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(CoordSeq::is_closed));
    }
}
