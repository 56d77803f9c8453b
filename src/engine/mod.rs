//! A single-threaded geometry engine addressed through handles.
//!
//! A [`Context`] owns every geometry created in it. Callers hold [`Handle`]s, which destroy their
//! geometry when dropped, or transfer it into a collection with [`Context::create_collection`].
//! Geometries owned by a collection are only reachable through non-owning [`HandleId`]s.
//!
//! Planar computations (relate, area, length, centroid, interior point) are delegated to
//! [`geo`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use geo::{Area, BoundingRect, Centroid, CoordsIter, EuclideanLength, InteriorPoint, Relate};
use thiserror::Error;

use crate::datatypes::{CollectionKind, Dimension, GeometryKind};
use crate::engine::store::{Leaf, Node, Store};

pub use coord::{Coord, CoordSeq};
pub use id::HandleId;
pub use relate::RelatePattern;

mod coord;
mod id;
mod relate;
pub(crate) mod store;

/// Errors raised by engine primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{0:?} does not refer to a live geometry")]
    StaleHandle(HandleId),

    #[error("Handle belongs to a different engine context")]
    ForeignHandle,

    #[error("{0:?} is already owned by a collection")]
    AlreadyOwned(HandleId),

    #[error("A {child} cannot be a member of a {collection}")]
    InvalidChild {
        collection: CollectionKind,
        child: GeometryKind,
    },

    #[error("Geometry index {index} out of bounds for {len} geometries")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid DE-9IM pattern: {0:?}")]
    InvalidPattern(String),

    #[error("A point holds at most one coordinate, got {0}")]
    InvalidPoint(usize),

    #[error("Incorrect geometry type for operation: {0}")]
    IncorrectGeometryType(String),

    #[error("{0:?} has a non-finite coordinate")]
    NonFiniteCoordinate(HandleId),
}

/// An engine execution context.
///
/// Cloning a context is cheap and yields another reference to the same geometry storage. A
/// context is neither `Send` nor `Sync`.
#[derive(Clone, Default)]
pub struct Context {
    store: Rc<RefCell<Store>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("live_handles", &self.live_handles())
            .finish()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both values refer to the same geometry storage.
    pub fn same_context(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }

    /// Number of live geometries in this context, collection members included.
    pub fn live_handles(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_alive(&self, id: HandleId) -> bool {
        self.store.borrow().is_alive(id)
    }

    fn insert(&self, leaf: Leaf) -> Handle {
        let id = self.store.borrow_mut().insert(Node::Leaf(leaf));
        Handle::new(self.clone(), id)
    }

    /// Creates a point. An empty sequence creates an empty point.
    pub fn create_point(&self, seq: CoordSeq) -> Result<Handle, EngineError> {
        if seq.len() > 1 {
            return Err(EngineError::InvalidPoint(seq.len()));
        }
        Ok(self.insert(Leaf::Point(seq)))
    }

    pub fn create_line_string(&self, seq: CoordSeq) -> Handle {
        self.insert(Leaf::LineString(seq))
    }

    pub fn create_linear_ring(&self, seq: CoordSeq) -> Handle {
        self.insert(Leaf::LinearRing(seq))
    }

    /// Creates a polygon from its exterior ring followed by any interior rings.
    pub fn create_polygon(&self, rings: Vec<CoordSeq>) -> Handle {
        self.insert(Leaf::Polygon(rings))
    }

    /// Assembles a collection that takes ownership of `children`.
    ///
    /// On error no child is transferred, and every handle in `children` is destroyed when the
    /// vec is dropped.
    pub fn create_collection(
        &self,
        kind: CollectionKind,
        children: Vec<Handle>,
    ) -> Result<Handle, EngineError> {
        if children.iter().any(|child| !self.same_context(&child.ctx)) {
            return Err(EngineError::ForeignHandle);
        }
        let ids = children.iter().map(Handle::id).collect::<Vec<_>>();
        let attached = self.store.borrow_mut().attach(kind, ids);
        let parent = attached?;
        children.into_iter().for_each(|child| {
            child.into_raw();
        });
        Ok(Handle::new(self.clone(), parent))
    }

    /// Deep-copies a geometry into a new, unowned handle.
    pub fn clone_geometry(&self, id: HandleId) -> Result<Handle, EngineError> {
        let mut store = self.store.borrow_mut();
        let tree = store.export(id)?;
        let copy = store.import(tree);
        Ok(Handle::new(self.clone(), copy))
    }

    /// Deep-copies a geometry stored in `other` into this context.
    pub fn copy_from(&self, other: &Context, id: HandleId) -> Result<Handle, EngineError> {
        if self.same_context(other) {
            return self.clone_geometry(id);
        }
        let tree = other.store.borrow().export(id)?;
        let copy = self.store.borrow_mut().import(tree);
        Ok(Handle::new(self.clone(), copy))
    }

    /// The raw geometry type id. See [`GeometryKind`] for the values.
    pub fn type_id(&self, id: HandleId) -> Result<i32, EngineError> {
        Ok(self.store.borrow().node(id)?.kind().into())
    }

    pub fn kind(&self, id: HandleId) -> Result<GeometryKind, EngineError> {
        Ok(self.store.borrow().node(id)?.kind())
    }

    /// Whether `id` is currently owned by a collection.
    pub fn is_owned(&self, id: HandleId) -> Result<bool, EngineError> {
        Ok(self.store.borrow().get(id)?.owner.is_some())
    }

    /// Number of direct members of a collection. Other geometries count as one.
    pub fn num_geometries(&self, id: HandleId) -> Result<usize, EngineError> {
        match self.store.borrow().node(id)? {
            Node::Leaf(_) => Ok(1),
            Node::Collection { children, .. } => Ok(children.len()),
        }
    }

    /// The `n`th member of a collection, or the geometry itself when `n` is zero and `id` is not
    /// a collection. The returned id stays owned by its parent.
    pub fn geometry_n(&self, id: HandleId, n: usize) -> Result<HandleId, EngineError> {
        match self.store.borrow().node(id)? {
            Node::Leaf(_) if n == 0 => Ok(id),
            Node::Leaf(_) => Err(EngineError::IndexOutOfBounds { index: n, len: 1 }),
            Node::Collection { children, .. } => {
                children
                    .get(n)
                    .copied()
                    .ok_or(EngineError::IndexOutOfBounds {
                        index: n,
                        len: children.len(),
                    })
            }
        }
    }

    /// Runs `f` against the leaf data of a point, line string, linear ring or polygon.
    pub(crate) fn with_leaf<R>(
        &self,
        id: HandleId,
        f: impl FnOnce(&Leaf) -> R,
    ) -> Result<R, EngineError> {
        match self.store.borrow().node(id)? {
            Node::Leaf(leaf) => Ok(f(leaf)),
            Node::Collection { kind, .. } => Err(EngineError::IncorrectGeometryType(format!(
                "expected a point, line or polygon, found {kind}"
            ))),
        }
    }

    /// The coordinates of a point, line string or linear ring.
    pub fn coord_seq(&self, id: HandleId) -> Result<CoordSeq, EngineError> {
        self.with_leaf(id, |leaf| match leaf {
            Leaf::Point(seq) | Leaf::LineString(seq) | Leaf::LinearRing(seq) => Ok(seq.clone()),
            Leaf::Polygon(_) => Err(EngineError::IncorrectGeometryType(
                "a polygon has no single coordinate sequence".to_string(),
            )),
        })?
    }

    /// The rings of a polygon, exterior first.
    pub fn rings(&self, id: HandleId) -> Result<Vec<CoordSeq>, EngineError> {
        self.with_leaf(id, |leaf| match leaf {
            Leaf::Polygon(rings) => Ok(rings.clone()),
            other => Err(EngineError::IncorrectGeometryType(format!(
                "expected a polygon, found {}",
                other.kind()
            ))),
        })?
    }

    /// Converts a geometry into its planar [`geo`] equivalent, dropping Z and M.
    pub fn to_geo(&self, id: HandleId) -> Result<geo::Geometry, EngineError> {
        let store = self.store.borrow();
        to_geo(&store, id)
    }

    /// Tests the DE-9IM relationship of two geometries against `pattern`.
    ///
    /// Geometries with NaN or infinite ordinates cannot be related and are rejected with
    /// [`EngineError::NonFiniteCoordinate`].
    pub fn relate_pattern(
        &self,
        a: HandleId,
        b: HandleId,
        pattern: &str,
    ) -> Result<bool, EngineError> {
        let pattern: RelatePattern = pattern.parse()?;
        let store = self.store.borrow();
        let matrix = finite_geo(&store, a)?.relate(&finite_geo(&store, b)?);
        Ok(pattern.matches(&matrix))
    }

    pub fn bounding_rect(&self, id: HandleId) -> Result<Option<geo::Rect>, EngineError> {
        Ok(self.to_geo(id)?.bounding_rect())
    }

    /// Unsigned planar area.
    pub fn area(&self, id: HandleId) -> Result<f64, EngineError> {
        Ok(self.to_geo(id)?.unsigned_area())
    }

    /// Planar length. Polygons contribute the length of every ring, points contribute zero.
    pub fn length(&self, id: HandleId) -> Result<f64, EngineError> {
        let store = self.store.borrow();
        length(&store, id)
    }

    /// Whether a line string or linear ring starts where it ends.
    pub fn is_closed(&self, id: HandleId) -> Result<bool, EngineError> {
        self.with_leaf(id, |leaf| match leaf {
            Leaf::LineString(seq) | Leaf::LinearRing(seq) => Ok(seq.is_closed()),
            other => Err(EngineError::IncorrectGeometryType(format!(
                "closedness is undefined for {}",
                other.kind()
            ))),
        })?
    }

    /// The centroid as a new point. An empty geometry yields an empty point.
    pub fn centroid(&self, id: HandleId) -> Result<Handle, EngineError> {
        let point = self.to_geo(id)?.centroid();
        self.create_point(point_seq(point))
    }

    /// A point guaranteed to lie on the geometry. An empty geometry yields an empty point.
    pub fn point_on_surface(&self, id: HandleId) -> Result<Handle, EngineError> {
        let point = finite_geo(&self.store.borrow(), id)?.interior_point();
        self.create_point(point_seq(point))
    }

    /// Translates an unowned geometry in place.
    pub fn translate(&self, id: HandleId, dx: f64, dy: f64) -> Result<(), EngineError> {
        let mut store = self.store.borrow_mut();
        if store.get(id)?.owner.is_some() {
            return Err(EngineError::AlreadyOwned(id));
        }
        store.translate(id, dx, dy)
    }

    fn destroy(&self, id: HandleId) {
        match self.store.try_borrow_mut() {
            Ok(mut store) => {
                if let Err(err) = store.destroy(id) {
                    log::warn!("Failed to destroy {id:?}: {err}");
                }
            }
            Err(_) => log::error!("Engine context is busy, leaking {id:?}"),
        }
    }
}

fn point_seq(point: Option<geo::Point>) -> CoordSeq {
    CoordSeq::from_coords(Dimension::XY, point.map(|p| Coord::from(p.0)))
}

/// Like [`to_geo`], for algorithms that panic on NaN or infinite ordinates.
fn finite_geo(store: &Store, id: HandleId) -> Result<geo::Geometry, EngineError> {
    let geom = to_geo(store, id)?;
    if geom
        .coords_iter()
        .all(|coord| coord.x.is_finite() && coord.y.is_finite())
    {
        Ok(geom)
    } else {
        Err(EngineError::NonFiniteCoordinate(id))
    }
}

/// Members that have no counterpart in a typed [`geo`] collection are an error, not skipped.
fn typed_members<T>(
    collection: CollectionKind,
    children: Vec<geo::Geometry>,
) -> Result<Vec<T>, EngineError>
where
    T: TryFrom<geo::Geometry>,
    T::Error: fmt::Display,
{
    children
        .into_iter()
        .map(|child| {
            T::try_from(child).map_err(|err| {
                EngineError::IncorrectGeometryType(format!(
                    "cannot export a member of a {collection}: {err}"
                ))
            })
        })
        .collect()
}

fn to_geo(store: &Store, id: HandleId) -> Result<geo::Geometry, EngineError> {
    let geom = match store.node(id)? {
        Node::Leaf(Leaf::Point(seq)) => match seq.coord(0) {
            Some(coord) => geo::Geometry::Point(geo::Point(coord.into())),
            None => geo::Geometry::MultiPoint(geo::MultiPoint::new(vec![])),
        },
        Node::Leaf(Leaf::LineString(seq)) | Node::Leaf(Leaf::LinearRing(seq)) => {
            geo::Geometry::LineString(seq.to_geo_line_string())
        }
        Node::Leaf(Leaf::Polygon(rings)) => geo::Geometry::Polygon(polygon_to_geo(rings)),
        Node::Collection { kind, children } => {
            let children = children
                .iter()
                .map(|child| to_geo(store, *child))
                .collect::<Result<Vec<_>, _>>()?;
            match kind {
                CollectionKind::GeometryCollection => {
                    geo::Geometry::GeometryCollection(geo::GeometryCollection::new_from(children))
                }
                CollectionKind::MultiPoint => geo::Geometry::MultiPoint(geo::MultiPoint::new(
                    typed_members(*kind, children)?,
                )),
                CollectionKind::MultiLineString => geo::Geometry::MultiLineString(
                    geo::MultiLineString::new(typed_members(*kind, children)?),
                ),
                CollectionKind::MultiPolygon => geo::Geometry::MultiPolygon(
                    geo::MultiPolygon::new(typed_members(*kind, children)?),
                ),
            }
        }
    };
    Ok(geom)
}

fn polygon_to_geo(rings: &[CoordSeq]) -> geo::Polygon {
    let mut rings = rings.iter().map(CoordSeq::to_geo_line_string);
    let exterior = rings.next().unwrap_or_else(|| geo::LineString::new(vec![]));
    geo::Polygon::new(exterior, rings.collect())
}

fn length(store: &Store, id: HandleId) -> Result<f64, EngineError> {
    match store.node(id)? {
        Node::Leaf(Leaf::Point(_)) => Ok(0.),
        Node::Leaf(Leaf::LineString(seq)) | Node::Leaf(Leaf::LinearRing(seq)) => {
            Ok(seq.to_geo_line_string().euclidean_length())
        }
        Node::Leaf(Leaf::Polygon(rings)) => Ok(rings
            .iter()
            .map(|ring| ring.to_geo_line_string().euclidean_length())
            .sum()),
        Node::Collection { children, .. } => children
            .iter()
            .try_fold(0., |total: f64, child| -> Result<f64, EngineError> {
                Ok(total + length(store, *child)?)
            }),
    }
}

/// An owned engine geometry.
///
/// Dropping a handle destroys its geometry, including every member of a collection.
pub struct Handle {
    ctx: Context,
    id: HandleId,
    live: bool,
}

impl Handle {
    fn new(ctx: Context, id: HandleId) -> Self {
        Self { ctx, id, live: true }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Gives up ownership without destroying the geometry.
    fn into_raw(mut self) -> HandleId {
        self.live = false;
        self.id
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if self.live {
            log::trace!("Destroying {:?}", self.id);
            self.ctx.destroy(self.id);
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    use super::*;

    fn square(ctx: &Context, x: f64, y: f64, size: f64) -> Handle {
        let mut ring = CoordSeq::from_coords(
            Dimension::XY,
            [(x, y), (x + size, y), (x + size, y + size), (x, y + size)],
        );
        ring.close();
        ctx.create_polygon(vec![ring])
    }

    fn line(ctx: &Context, coords: &[(f64, f64)]) -> Handle {
        ctx.create_line_string(CoordSeq::from_coords(Dimension::XY, coords.iter().copied()))
    }

    #[test]
    fn drop_destroys() {
        let ctx = Context::new();
        let a = square(&ctx, 0., 0., 1.);
        let id = a.id();
        assert_eq!(ctx.live_handles(), 1);
        drop(a);
        assert_eq!(ctx.live_handles(), 0);
        assert_eq!(ctx.kind(id), Err(EngineError::StaleHandle(id)));
    }

    #[test]
    fn collection_owns_children() {
        let ctx = Context::new();
        let a = square(&ctx, 0., 0., 1.);
        let b = square(&ctx, 2., 0., 1.);
        let a_id = a.id();
        let collection = ctx
            .create_collection(CollectionKind::MultiPolygon, vec![a, b])
            .unwrap();
        assert_eq!(ctx.live_handles(), 3);
        assert_eq!(ctx.num_geometries(collection.id()), Ok(2));
        assert_eq!(ctx.geometry_n(collection.id(), 0), Ok(a_id));
        assert_eq!(ctx.is_owned(a_id), Ok(true));
        assert_matches!(
            ctx.geometry_n(collection.id(), 2),
            Err(EngineError::IndexOutOfBounds { index: 2, len: 2 })
        );

        drop(collection);
        assert_eq!(ctx.live_handles(), 0);
    }

    #[test]
    fn rejected_collection_destroys_children() {
        let ctx = Context::new();
        let a = square(&ctx, 0., 0., 1.);
        let b = line(&ctx, &[(0., 0.), (1., 1.)]);
        let result = ctx.create_collection(CollectionKind::MultiPolygon, vec![a, b]);
        assert_matches!(
            result,
            Err(EngineError::InvalidChild {
                collection: CollectionKind::MultiPolygon,
                child: GeometryKind::LineString,
            })
        );
        assert_eq!(ctx.live_handles(), 0);
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let ctx = Context::new();
        let other = Context::new();
        let a = square(&other, 0., 0., 1.);
        let result = ctx.create_collection(CollectionKind::GeometryCollection, vec![a]);
        assert_matches!(result, Err(EngineError::ForeignHandle));
        assert_eq!(other.live_handles(), 0);
    }

    #[test]
    fn owned_members_cannot_be_translated() {
        let ctx = Context::new();
        let a = square(&ctx, 0., 0., 1.);
        let a_id = a.id();
        let collection = ctx
            .create_collection(CollectionKind::GeometryCollection, vec![a])
            .unwrap();
        assert_eq!(
            ctx.translate(a_id, 1., 1.),
            Err(EngineError::AlreadyOwned(a_id))
        );
        ctx.translate(collection.id(), 1., 1.).unwrap();
        assert_eq!(ctx.rings(a_id).unwrap()[0].x(0), 1.);
    }

    #[test]
    fn clone_is_independent() {
        let ctx = Context::new();
        let a = square(&ctx, 0., 0., 1.);
        let collection = ctx
            .create_collection(CollectionKind::MultiPolygon, vec![a])
            .unwrap();
        let copy = ctx.clone_geometry(collection.id()).unwrap();
        assert_eq!(ctx.live_handles(), 4);
        assert_eq!(ctx.is_owned(copy.id()), Ok(false));

        ctx.translate(copy.id(), 5., 0.).unwrap();
        let original = ctx.geometry_n(collection.id(), 0).unwrap();
        assert_eq!(ctx.rings(original).unwrap()[0].x(0), 0.);
    }

    #[test]
    fn copy_between_contexts() {
        let ctx = Context::new();
        let other = Context::new();
        let a = line(&other, &[(0., 0.), (3., 4.)]);
        let copy = ctx.copy_from(&other, a.id()).unwrap();
        assert_eq!(ctx.kind(copy.id()), Ok(GeometryKind::LineString));
        assert_relative_eq!(ctx.length(copy.id()).unwrap(), 5.);
        assert_eq!(other.live_handles(), 1);
    }

    #[test]
    fn relate_pattern() {
        let ctx = Context::new();
        let a = square(&ctx, 0., 0., 2.);
        let b = square(&ctx, 1., 1., 2.);
        let c = square(&ctx, 2., 0., 1.);
        assert_eq!(ctx.relate_pattern(a.id(), b.id(), "2********"), Ok(true));
        assert_eq!(ctx.relate_pattern(a.id(), c.id(), "2********"), Ok(false));
        assert_eq!(ctx.relate_pattern(a.id(), c.id(), "****1****"), Ok(true));
        assert_matches!(
            ctx.relate_pattern(a.id(), b.id(), "2***"),
            Err(EngineError::InvalidPattern(_))
        );
    }

    #[test]
    fn non_finite_coordinates_cannot_be_related() {
        let ctx = Context::new();
        let mut ring = CoordSeq::from_coords(Dimension::XY, [(0., 0.), (f64::NAN, 0.), (1., 1.)]);
        ring.close();
        let nan = ctx.create_polygon(vec![ring]);
        let b = square(&ctx, 0., 0., 2.);
        assert_eq!(
            ctx.relate_pattern(b.id(), nan.id(), "2********"),
            Err(EngineError::NonFiniteCoordinate(nan.id()))
        );
        assert_eq!(
            ctx.point_on_surface(nan.id()).map(|p| p.id()),
            Err(EngineError::NonFiniteCoordinate(nan.id()))
        );
    }

    #[test]
    fn unexportable_members_are_an_error() {
        let ctx = Context::new();
        let point = ctx
            .create_point(CoordSeq::from_coords(Dimension::XY, [(0., 1.)]))
            .unwrap();
        let empty = ctx
            .create_point(CoordSeq::from_coords(Dimension::XY, Vec::<Coord>::new()))
            .unwrap();
        let multi_point = ctx
            .create_collection(CollectionKind::MultiPoint, vec![point, empty])
            .unwrap();
        assert_matches!(
            ctx.to_geo(multi_point.id()),
            Err(EngineError::IncorrectGeometryType(_))
        );
    }

    #[test]
    fn measures() {
        let ctx = Context::new();
        let a = square(&ctx, 0., 0., 2.);
        let b = square(&ctx, 5., 5., 1.);
        let polygons = ctx
            .create_collection(CollectionKind::MultiPolygon, vec![a, b])
            .unwrap();
        assert_relative_eq!(ctx.area(polygons.id()).unwrap(), 5.);
        assert_relative_eq!(ctx.length(polygons.id()).unwrap(), 12.);

        let l = line(&ctx, &[(0., 0.), (0., 3.)]);
        assert_relative_eq!(ctx.length(l.id()).unwrap(), 3.);
        assert_eq!(ctx.is_closed(l.id()), Ok(false));
        assert_matches!(
            ctx.is_closed(polygons.id()),
            Err(EngineError::IncorrectGeometryType(_))
        );
    }

    #[test]
    fn centroid_of_empty_is_empty_point() {
        let ctx = Context::new();
        let empty = ctx
            .create_collection(CollectionKind::MultiPolygon, vec![])
            .unwrap();
        let centroid = ctx.centroid(empty.id()).unwrap();
        assert_eq!(ctx.kind(centroid.id()), Ok(GeometryKind::Point));
        assert!(ctx.coord_seq(centroid.id()).unwrap().is_empty());
    }

    #[test]
    fn point_holds_one_coordinate() {
        let ctx = Context::new();
        let seq = CoordSeq::from_coords(Dimension::XY, [(0., 0.), (1., 1.)]);
        assert_matches!(ctx.create_point(seq), Err(EngineError::InvalidPoint(2)));
    }
}
