use crate::datatypes::{CollectionKind, Dimension};
use crate::engine::{CoordSeq, Handle};
use crate::error::ElementError;
use crate::factory::Factory;
use crate::io::Element;
use crate::scalar::geometrycollection::builder::create_collection;
use crate::scalar::Subtype;

/// The coordinates of a [`geo::LineString`] in `dim`, with any Z or M ordinate set to NaN.
pub fn line_string_seq(line_string: &geo::LineString, dim: Dimension) -> CoordSeq {
    CoordSeq::from_coords(dim, line_string.coords().copied())
}

/// The rings of a [`geo::Polygon`], exterior first.
pub fn polygon_rings(polygon: &geo::Polygon, dim: Dimension) -> Vec<CoordSeq> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| line_string_seq(ring, dim))
        .collect()
}

fn collection_from_geo(
    factory: &Factory,
    kind: CollectionKind,
    members: impl Iterator<Item = geo::Geometry>,
) -> Result<Handle, ElementError> {
    let collection = create_collection(factory, kind, members.map(Element::Geo))
        .map_err(|err| ElementError::Nested(Box::new(err)))?;
    let (_, handle, _) = collection.into_geometry().into_parts();
    Ok(handle)
}

/// Creates an unowned engine geometry from a [`geo::Geometry`].
///
/// Lines, rects and triangles have no engine counterpart and are tagged with a [`Subtype`].
pub(crate) fn geometry_from_geo(
    factory: &Factory,
    geom: &geo::Geometry,
) -> Result<(Handle, Option<Subtype>), ElementError> {
    let ctx = factory.context();
    let dim = factory.dimension();
    let converted = match geom {
        geo::Geometry::Point(point) => (
            ctx.create_point(CoordSeq::from_coords(dim, [point.0]))?,
            None,
        ),
        geo::Geometry::Line(line) => (
            ctx.create_line_string(CoordSeq::from_coords(dim, [line.start, line.end])),
            Some(Subtype::Line),
        ),
        geo::Geometry::LineString(line_string) => (
            ctx.create_line_string(line_string_seq(line_string, dim)),
            None,
        ),
        geo::Geometry::Polygon(polygon) => (ctx.create_polygon(polygon_rings(polygon, dim)), None),
        geo::Geometry::Rect(rect) => (
            ctx.create_polygon(polygon_rings(&rect.to_polygon(), dim)),
            Some(Subtype::Rect),
        ),
        geo::Geometry::Triangle(triangle) => (
            ctx.create_polygon(polygon_rings(&triangle.to_polygon(), dim)),
            Some(Subtype::Triangle),
        ),
        geo::Geometry::MultiPoint(multi_point) => (
            collection_from_geo(
                factory,
                CollectionKind::MultiPoint,
                multi_point.iter().map(|p| geo::Geometry::Point(*p)),
            )?,
            None,
        ),
        geo::Geometry::MultiLineString(multi_line_string) => (
            collection_from_geo(
                factory,
                CollectionKind::MultiLineString,
                multi_line_string
                    .iter()
                    .map(|l| geo::Geometry::LineString(l.clone())),
            )?,
            None,
        ),
        geo::Geometry::MultiPolygon(multi_polygon) => (
            collection_from_geo(
                factory,
                CollectionKind::MultiPolygon,
                multi_polygon
                    .iter()
                    .map(|p| geo::Geometry::Polygon(p.clone())),
            )?,
            None,
        ),
        geo::Geometry::GeometryCollection(collection) => (
            collection_from_geo(
                factory,
                CollectionKind::GeometryCollection,
                collection.iter().cloned(),
            )?,
            None,
        ),
    };
    Ok(converted)
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use geo::{line_string, point, polygon, Rect};

    use super::*;
    use crate::datatypes::GeometryKind;
    use crate::error::GeoCollectionError;

    #[test]
    fn simple_geometries() {
        let factory = Factory::default();
        let (handle, subtype) =
            geometry_from_geo(&factory, &point!(x: 1., y: 2.).into()).unwrap();
        assert_eq!(factory.context().kind(handle.id()), Ok(GeometryKind::Point));
        assert_eq!(subtype, None);

        let (handle, subtype) = geometry_from_geo(
            &factory,
            &geo::Line::new((0., 0.), (1., 1.)).into(),
        )
        .unwrap();
        assert_eq!(
            factory.context().kind(handle.id()),
            Ok(GeometryKind::LineString)
        );
        assert_eq!(subtype, Some(Subtype::Line));

        let (handle, subtype) = geometry_from_geo(
            &factory,
            &Rect::new((0., 0.), (1., 1.)).into(),
        )
        .unwrap();
        assert_eq!(factory.context().kind(handle.id()), Ok(GeometryKind::Polygon));
        assert_eq!(subtype, Some(Subtype::Rect));
    }

    #[test]
    fn nested_collections() {
        let factory = Factory::default();
        let inner = geo::Geometry::MultiLineString(geo::MultiLineString::new(vec![
            line_string![(x: 0., y: 0.), (x: 1., y: 1.)],
        ]));
        let collection = geo::Geometry::GeometryCollection(geo::GeometryCollection::new_from(
            vec![point!(x: 0., y: 0.).into(), inner],
        ));
        let (handle, _) = geometry_from_geo(&factory, &collection).unwrap();
        let ctx = factory.context();
        assert_eq!(ctx.num_geometries(handle.id()), Ok(2));
        let inner = ctx.geometry_n(handle.id(), 1).unwrap();
        assert_eq!(ctx.kind(inner), Ok(GeometryKind::MultiLineString));
        assert_eq!(ctx.live_handles(), 4);
        assert_eq!(ctx.to_geo(handle.id()).unwrap(), collection);
    }

    #[test]
    fn invalid_nested_multi_polygon() {
        let factory = Factory::default();
        let multi_polygon = geo::MultiPolygon::new(vec![
            polygon![(x: 0., y: 0.), (x: 2., y: 0.), (x: 2., y: 2.), (x: 0., y: 2.)],
            polygon![(x: 1., y: 1.), (x: 3., y: 1.), (x: 3., y: 3.), (x: 1., y: 3.)],
        ]);
        let result = geometry_from_geo(&factory, &multi_polygon.into());
        assert_matches!(
            result,
            Err(ElementError::Nested(err)) if matches!(*err, GeoCollectionError::InvalidArrangement(_))
        );
        assert_eq!(factory.context().live_handles(), 0);
    }
}
