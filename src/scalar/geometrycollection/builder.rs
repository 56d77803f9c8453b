//! Atomic construction of collections from caller elements.

use crate::algorithm::native::validate::validate_multi_polygon;
use crate::datatypes::CollectionKind;
use crate::engine::Handle;
use crate::error::{ArrangementError, GeoCollectionError, Result};
use crate::factory::Factory;
use crate::io::Element;
use crate::scalar::{Geometry, GeometryCollection, Subtype};

/// Only materializes the tag list when at least one member carries a tag.
fn sparse_subtypes(tags: Vec<Option<Subtype>>) -> Option<Vec<Option<Subtype>>> {
    tags.iter().any(Option::is_some).then_some(tags)
}

/// Creates a collection of `kind` owning every element.
///
/// Elements are converted in order. If one fails, every handle converted so far is destroyed
/// and the index of the failing element is reported. MultiPolygons are checked for overlapping
/// members unless the factory disables validation.
pub(crate) fn create_collection<'a>(
    factory: &Factory,
    kind: CollectionKind,
    elements: impl IntoIterator<Item = Element<'a>>,
) -> Result<GeometryCollection> {
    let elements = elements.into_iter();
    let capacity = elements.size_hint().0.max(1);
    let mut handles: Vec<Handle> = Vec::with_capacity(capacity);
    let mut tags = Vec::with_capacity(capacity);

    let expected = kind.element_kind();
    for (index, element) in elements.enumerate() {
        match element.into_detached(factory, expected) {
            Ok((handle, subtype)) => {
                handles.push(handle);
                tags.push(subtype);
            }
            Err(source) => {
                log::warn!(
                    "Element {index} cannot be a member of a {kind}, releasing {} converted elements: {source}",
                    handles.len()
                );
                return Err(GeoCollectionError::InvalidElement { index, source });
            }
        }
    }

    let subtypes = sparse_subtypes(tags);
    let len = handles.len();
    let ctx = factory.context();
    let handle = ctx
        .create_collection(kind, handles)
        .map_err(ArrangementError::Assembly)?;

    if kind == CollectionKind::MultiPolygon && factory.config().validate_multi_polygons {
        if let Err(violation) = validate_multi_polygon(ctx, handle.id()) {
            log::warn!("Rejecting MultiPolygon with {len} members: {violation}");
            return Err(ArrangementError::Topology(violation).into());
        }
    }

    log::debug!("Created {kind} with {len} members");
    Ok(GeometryCollection::new(
        Geometry::wrap(factory, handle, None)?,
        kind,
        subtypes,
    ))
}
