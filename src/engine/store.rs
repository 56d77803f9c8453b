//! Slot storage for engine geometries.

use crate::datatypes::{CollectionKind, GeometryKind};
use crate::engine::coord::CoordSeq;
use crate::engine::{EngineError, HandleId};

/// Geometry data that owns no other engine geometry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Leaf {
    Point(CoordSeq),
    LineString(CoordSeq),
    LinearRing(CoordSeq),
    /// Exterior ring first. An empty vec is an empty polygon.
    Polygon(Vec<CoordSeq>),
}

impl Leaf {
    pub(crate) fn kind(&self) -> GeometryKind {
        match self {
            Leaf::Point(_) => GeometryKind::Point,
            Leaf::LineString(_) => GeometryKind::LineString,
            Leaf::LinearRing(_) => GeometryKind::LinearRing,
            Leaf::Polygon(_) => GeometryKind::Polygon,
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Leaf::Point(seq) | Leaf::LineString(seq) | Leaf::LinearRing(seq) => {
                seq.translate(dx, dy)
            }
            Leaf::Polygon(rings) => rings.iter_mut().for_each(|ring| ring.translate(dx, dy)),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Node {
    Leaf(Leaf),
    Collection {
        kind: CollectionKind,
        children: Vec<HandleId>,
    },
}

impl Node {
    pub(crate) fn kind(&self) -> GeometryKind {
        match self {
            Node::Leaf(leaf) => leaf.kind(),
            Node::Collection { kind, .. } => (*kind).into(),
        }
    }
}

/// A geometry detached from any store, used to copy geometries between and within contexts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Tree {
    Leaf(Leaf),
    Collection {
        kind: CollectionKind,
        children: Vec<Tree>,
    },
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) node: Node,
    pub(crate) owner: Option<HandleId>,
}

/// Generational slot storage.
///
/// Destroyed geometries are recycled via a free list, and generation counters prevent stale
/// id access.
#[derive(Debug, Default)]
pub(crate) struct Store {
    slots: Vec<Option<Entry>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
}

impl Store {
    pub(crate) fn insert(&mut self, node: Node) -> HandleId {
        let entry = Entry { node, owner: None };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generation[idx as usize] += 1;
            self.slots[idx as usize] = Some(entry);
            idx
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Some(entry));
            self.generation.push(0);
            idx
        };

        HandleId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn get(&self, id: HandleId) -> Result<&Entry, EngineError> {
        match self.slots.get(id.idx as usize) {
            Some(Some(entry)) if self.generation[id.idx as usize] == id.generation => Ok(entry),
            _ => Err(EngineError::StaleHandle(id)),
        }
    }

    pub(crate) fn get_mut(&mut self, id: HandleId) -> Result<&mut Entry, EngineError> {
        match self.slots.get_mut(id.idx as usize) {
            Some(Some(entry)) if self.generation[id.idx as usize] == id.generation => Ok(entry),
            _ => Err(EngineError::StaleHandle(id)),
        }
    }

    pub(crate) fn node(&self, id: HandleId) -> Result<&Node, EngineError> {
        Ok(&self.get(id)?.node)
    }

    pub(crate) fn is_alive(&self, id: HandleId) -> bool {
        self.get(id).is_ok()
    }

    /// Number of live geometries, children included.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Removes a geometry and, recursively, every geometry it owns.
    pub(crate) fn destroy(&mut self, id: HandleId) -> Result<(), EngineError> {
        self.get(id)?;
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let idx = id.idx as usize;
            if let Some(entry) = self.slots[idx].take() {
                if let Node::Collection { children, .. } = entry.node {
                    pending.extend(children);
                }
                self.free_list.push(id.idx);
            }
        }
        Ok(())
    }

    /// Stores `children` under a new collection node, marking each as owned by it.
    ///
    /// Every child must be live and unowned; nothing is modified otherwise.
    pub(crate) fn attach(
        &mut self,
        kind: CollectionKind,
        children: Vec<HandleId>,
    ) -> Result<HandleId, EngineError> {
        for child in &children {
            let entry = self.get(*child)?;
            if entry.owner.is_some() {
                return Err(EngineError::AlreadyOwned(*child));
            }
            let child_kind = entry.node.kind();
            if !kind.accepts(child_kind) {
                return Err(EngineError::InvalidChild {
                    collection: kind,
                    child: child_kind,
                });
            }
        }

        let parent = self.insert(Node::Collection {
            kind,
            children: children.clone(),
        });
        for child in children {
            self.get_mut(child)?.owner = Some(parent);
        }
        Ok(parent)
    }

    pub(crate) fn export(&self, id: HandleId) -> Result<Tree, EngineError> {
        match self.node(id)? {
            Node::Leaf(leaf) => Ok(Tree::Leaf(leaf.clone())),
            Node::Collection { kind, children } => Ok(Tree::Collection {
                kind: *kind,
                children: children
                    .iter()
                    .map(|child| self.export(*child))
                    .collect::<Result<_, _>>()?,
            }),
        }
    }

    pub(crate) fn import(&mut self, tree: Tree) -> HandleId {
        match tree {
            Tree::Leaf(leaf) => self.insert(Node::Leaf(leaf)),
            Tree::Collection { kind, children } => {
                let children = children
                    .into_iter()
                    .map(|child| self.import(child))
                    .collect::<Vec<_>>();
                let parent = self.insert(Node::Collection {
                    kind,
                    children: children.clone(),
                });
                for child in children {
                    if let Some(Some(entry)) = self.slots.get_mut(child.idx as usize) {
                        entry.owner = Some(parent);
                    }
                }
                parent
            }
        }
    }

    /// Translates a geometry and everything it owns in place.
    pub(crate) fn translate(&mut self, id: HandleId, dx: f64, dy: f64) -> Result<(), EngineError> {
        let children = match &mut self.get_mut(id)?.node {
            Node::Leaf(leaf) => {
                leaf.translate(dx, dy);
                return Ok(());
            }
            Node::Collection { children, .. } => children.clone(),
        };
        children
            .into_iter()
            .try_for_each(|child| self.translate(child, dx, dy))
    }
}
