use std::fmt;

use crate::algorithm::native::eq::{geometries_equal, Equality};
use crate::datatypes::GeometryKind;
use crate::engine::{CoordSeq, EngineError, Handle, HandleId};
use crate::error::Result;
use crate::factory::Factory;
use crate::scalar::Subtype;

/// A single engine geometry of any kind, owned by the caller.
///
/// Dropping a `Geometry` destroys the underlying engine geometry.
pub struct Geometry {
    factory: Factory,
    handle: Handle,
    kind: GeometryKind,
    subtype: Option<Subtype>,
}

impl Geometry {
    /// Wraps an unowned engine handle created in `factory`'s context.
    pub fn wrap(factory: &Factory, handle: Handle, subtype: Option<Subtype>) -> Result<Self> {
        if !factory.context().same_context(handle.context()) {
            return Err(EngineError::ForeignHandle.into());
        }
        let kind = factory.context().kind(handle.id())?;
        Ok(Self {
            factory: factory.clone(),
            handle,
            kind,
            subtype,
        })
    }

    /// Wraps a fresh copy of `id`, leaving the original with its current owner.
    pub fn wrap_clone(factory: &Factory, id: HandleId, subtype: Option<Subtype>) -> Result<Self> {
        let handle = factory.context().clone_geometry(id)?;
        Self::wrap(factory, handle, subtype)
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn handle_id(&self) -> HandleId {
        self.handle.id()
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn subtype(&self) -> Option<Subtype> {
        self.subtype
    }

    pub fn with_subtype(self, subtype: Option<Subtype>) -> Self {
        Self { subtype, ..self }
    }

    /// The coordinates of a point, line string or linear ring.
    pub fn coords(&self) -> Result<CoordSeq> {
        Ok(self.factory.context().coord_seq(self.handle_id())?)
    }

    pub fn to_geo(&self) -> Result<geo::Geometry> {
        Ok(self.factory.context().to_geo(self.handle_id())?)
    }

    /// Moves the geometry in place.
    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        Ok(self.factory.context().translate(self.handle_id(), dx, dy)?)
    }

    /// Structural equality. Geometries from different factories are never equal.
    pub fn eql(&self, other: &Geometry) -> Equality {
        if self.factory != other.factory {
            return Equality::NotEqual;
        }
        geometries_equal(
            self.factory.context(),
            self.handle_id(),
            other.handle_id(),
            self.factory.config().checks_z(),
        )
    }

    /// A deep copy with the same subtype tag.
    pub fn try_clone(&self) -> Result<Self> {
        Self::wrap_clone(&self.factory, self.handle_id(), self.subtype)
    }

    pub(crate) fn into_parts(self) -> (Factory, Handle, Option<Subtype>) {
        (self.factory, self.handle, self.subtype)
    }
}

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geometry")
            .field("kind", &self.kind)
            .field("subtype", &self.subtype)
            .field("handle", &self.handle)
            .finish()
    }
}
