use crate::algorithm::native::eq::{collections_equal, Equality};
use crate::datatypes::CollectionKind;
use crate::error::{GeoCollectionError, Result};
use crate::factory::Factory;
use crate::io::Element;
use crate::scalar::geometrycollection::builder::create_collection;
use crate::scalar::geometrycollection::GeometryCollectionIterator;
use crate::scalar::{Geometry, Subtype};

/// An immutable, ordered collection of geometries.
///
/// Members are owned by the collection and only handed out as copies.
#[derive(Debug)]
pub struct GeometryCollection {
    geom: Geometry,
    kind: CollectionKind,
    subtypes: Option<Vec<Option<Subtype>>>,
}

impl GeometryCollection {
    pub(crate) fn new(
        geom: Geometry,
        kind: CollectionKind,
        subtypes: Option<Vec<Option<Subtype>>>,
    ) -> Self {
        Self {
            geom,
            kind,
            subtypes,
        }
    }

    /// Builds a collection of `kind` from `elements`.
    ///
    /// Either every element becomes a member or the call fails and every element is released.
    pub fn try_new<'a, E: Into<Element<'a>>>(
        factory: &Factory,
        kind: CollectionKind,
        elements: impl IntoIterator<Item = E>,
    ) -> Result<Self> {
        create_collection(factory, kind, elements.into_iter().map(Into::into))
    }

    pub fn geometry_type(&self) -> CollectionKind {
        self.kind
    }

    pub fn factory(&self) -> &Factory {
        self.geom.factory()
    }

    /// The number of members, queried from the engine.
    pub fn num_geometries(&self) -> usize {
        self.factory()
            .context()
            .num_geometries(self.geom.handle_id())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.num_geometries()
    }

    pub fn is_empty(&self) -> bool {
        self.num_geometries() == 0
    }

    /// Subtype tags of the members, if any member was created from a tagged shape.
    pub fn subtypes(&self) -> Option<&[Option<Subtype>]> {
        self.subtypes.as_deref()
    }

    /// A copy of member `i`, or `None` when out of range.
    pub fn geometry_n(&self, i: usize) -> Option<Geometry> {
        let factory = self.factory();
        let id = factory.context().geometry_n(self.geom.handle_id(), i).ok()?;
        let subtype = self
            .subtypes
            .as_ref()
            .and_then(|subtypes| subtypes.get(i).copied().flatten());
        Geometry::wrap_clone(factory, id, subtype).ok()
    }

    /// A copy of member `i`. Negative indices count back from the last member.
    pub fn get(&self, i: isize) -> Option<Geometry> {
        let len = self.num_geometries() as isize;
        let i = if i < 0 { i + len } else { i };
        if i < 0 || i >= len {
            return None;
        }
        self.geometry_n(i as usize)
    }

    pub fn iter(&self) -> GeometryCollectionIterator<'_> {
        GeometryCollectionIterator::new(self)
    }

    /// Calls `f` with a copy of every member, in order.
    pub fn for_each(&self, f: impl FnMut(Geometry)) {
        log::debug!(
            "Visiting {} members of {}",
            self.num_geometries(),
            self.kind
        );
        self.iter().for_each(f)
    }

    /// Structural equality.
    ///
    /// Collections from different factories or of different kinds are never equal. Z and M are
    /// compared when the factory stores them.
    pub fn eql(&self, other: &GeometryCollection) -> Equality {
        if self.factory() != other.factory() || self.kind != other.kind {
            return Equality::NotEqual;
        }
        collections_equal(
            self.factory().context(),
            Some(self.geom.handle_id()),
            Some(other.geom.handle_id()),
            self.factory().config().checks_z(),
        )
    }

    /// Converts into a [`geo`] geometry.
    ///
    /// Fails when a member has no [`geo`] counterpart, such as an empty point in a MultiPoint.
    pub fn to_geo(&self) -> Result<geo::Geometry> {
        self.geom.to_geo()
    }

    /// A deep copy with the same subtype tags.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self::new(
            self.geom.try_clone()?,
            self.kind,
            self.subtypes.clone(),
        ))
    }

    pub fn as_geometry(&self) -> &Geometry {
        &self.geom
    }

    pub fn into_geometry(self) -> Geometry {
        self.geom
    }
}

impl TryFrom<Geometry> for GeometryCollection {
    type Error = GeoCollectionError;

    fn try_from(value: Geometry) -> Result<Self> {
        let kind = CollectionKind::try_from(value.kind())?;
        Ok(Self::new(value, kind, None))
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;
    use crate::datatypes::GeometryKind;
    use crate::test::{linestring, point, polygon};

    #[test]
    fn mixed_members() {
        let factory = Factory::default();
        let collection = factory
            .collection([
                point::p0(&factory),
                linestring::ls0(&factory),
                polygon::p0(&factory),
            ])
            .unwrap();
        assert_eq!(collection.geometry_type(), CollectionKind::GeometryCollection);
        assert_eq!(collection.len(), 3);
        let kinds = collection.iter().map(|g| g.kind()).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                GeometryKind::Point,
                GeometryKind::LineString,
                GeometryKind::Polygon
            ]
        );
        assert!(collection.subtypes().is_none());
    }

    #[test]
    fn negative_indices() {
        let factory = Factory::default();
        let collection = factory
            .multi_point([point::p0(&factory), point::p1(&factory)])
            .unwrap();
        let last = collection.get(-1).unwrap();
        assert_eq!(last.eql(&collection.get(1).unwrap()), Equality::Equal);
        assert_eq!(
            collection.get(-2).unwrap().eql(&point::p0(&factory)),
            Equality::Equal
        );
        assert!(collection.get(-3).is_none());
        assert!(collection.get(2).is_none());
        assert!(collection.geometry_n(2).is_none());
    }

    #[test]
    fn members_are_copies() {
        let factory = Factory::default();
        let collection = factory.collection([point::p0(&factory)]).unwrap();
        let before = factory.context().live_handles();
        let mut member = collection.get(0).unwrap();
        assert_eq!(factory.context().live_handles(), before + 1);

        member.translate(10., 10.).unwrap();
        assert_eq!(
            collection.get(0).unwrap().eql(&point::p0(&factory)),
            Equality::Equal
        );
        drop(member);
        assert_eq!(factory.context().live_handles(), before);
    }

    #[test]
    fn iterator_is_exact_and_reversible() {
        let factory = Factory::default();
        let collection = factory
            .multi_point([point::p0(&factory), point::p1(&factory), point::p2(&factory)])
            .unwrap();
        let mut iter = collection.iter();
        assert_eq!(iter.len(), 3);
        let last = iter.next_back().unwrap();
        assert_eq!(last.eql(&point::p2(&factory)), Equality::Equal);
        assert_eq!(iter.len(), 2);
        assert_eq!((&*collection).into_iter().count(), 3);
    }

    #[test]
    fn eql_requires_same_kind() {
        let factory = Factory::default();
        let a = factory.collection([point::p0(&factory)]).unwrap();
        let b = factory.multi_point([point::p0(&factory)]).unwrap();
        assert_eq!(a.eql(&b), Equality::NotEqual);
        assert_eq!(a.eql(&a.try_clone().unwrap()), Equality::Equal);
    }

    #[test]
    fn try_from_geometry() {
        let factory = Factory::default();
        let collection = factory.collection([point::p0(&factory)]).unwrap();
        let geom = collection.into_geometry();
        let collection = GeometryCollection::try_from(geom).unwrap();
        assert_eq!(collection.len(), 1);

        assert_matches!(
            GeometryCollection::try_from(point::p0(&factory)),
            Err(GeoCollectionError::Engine(_))
        );
    }

    #[test]
    fn to_geo() {
        let factory = Factory::default();
        let collection = factory
            .collection([point::p0(&factory), linestring::ls0(&factory)])
            .unwrap();
        let geo::Geometry::GeometryCollection(geom) = collection.to_geo().unwrap() else {
            panic!("expected a geometry collection");
        };
        assert_eq!(geom.len(), 2);
    }
}
