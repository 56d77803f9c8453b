use std::fmt;

/// A non-owning reference to a geometry stored in a [`Context`](super::Context).
///
/// Contains both a slot index and a generation counter so that stale ids can be detected after
/// the geometry is destroyed and its slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl HandleId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandleId({}@gen{})", self.idx, self.generation)
    }
}
