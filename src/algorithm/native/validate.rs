//! Topological validation of MultiPolygon members.
//!
//! The engine assembles a MultiPolygon from any set of polygons. A valid MultiPolygon
//! additionally requires that no two members share interior area and that member boundaries
//! only touch at points.

use geo::Intersects;
use thiserror::Error;

use crate::engine::{Context, EngineError, HandleId};

/// Members share two-dimensional interior area.
pub const INTERIOR_OVERLAP: &str = "2********";

/// Member boundaries intersect along a line.
pub const BOUNDARY_OVERLAP: &str = "****1****";

/// The first pair of members found to break MultiPolygon validity.
///
/// `first` is always the larger index.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("polygons {first} and {second}: {reason}")]
pub struct Violation {
    pub first: usize,
    pub second: usize,
    pub reason: ViolationReason,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViolationReason {
    #[error("interiors overlap")]
    Overlap,

    #[error("boundaries share a line")]
    SharedBoundary,

    #[error("relationship could not be determined: {0}")]
    Undetermined(EngineError),
}

/// Checks every member of an assembled MultiPolygon.
pub fn validate_multi_polygon(ctx: &Context, multi_polygon: HandleId) -> Result<(), Violation> {
    let members = ctx
        .num_geometries(multi_polygon)
        .and_then(|n| {
            (0..n)
                .map(|i| ctx.geometry_n(multi_polygon, i))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|err| Violation {
            first: 0,
            second: 0,
            reason: ViolationReason::Undetermined(err),
        })?;
    validate_polygons(ctx, &members)
}

/// Checks an ordered list of polygons pairwise.
///
/// Pairs are visited by ascending `i`, then ascending `j < i`, and the first violation is
/// returned. Pairs with disjoint bounding rectangles cannot match either pattern and are not
/// related.
pub fn validate_polygons(ctx: &Context, polygons: &[HandleId]) -> Result<(), Violation> {
    let bounds = polygons
        .iter()
        .map(|id| ctx.bounding_rect(*id))
        .collect::<Vec<_>>();

    for i in 1..polygons.len() {
        for j in 0..i {
            let violation = |reason| Violation {
                first: i,
                second: j,
                reason,
            };
            match (&bounds[i], &bounds[j]) {
                (Err(err), _) | (_, Err(err)) => {
                    return Err(violation(ViolationReason::Undetermined(err.clone())))
                }
                (Ok(Some(a)), Ok(Some(b))) if !a.intersects(b) => continue,
                // Empty polygons touch nothing.
                (Ok(None), _) | (_, Ok(None)) => continue,
                _ => {}
            }

            if let Some(reason) = relate_pair(ctx, polygons[i], polygons[j]) {
                return Err(violation(reason));
            }
        }
    }
    Ok(())
}

fn relate_pair(ctx: &Context, a: HandleId, b: HandleId) -> Option<ViolationReason> {
    for (pattern, reason) in [
        (INTERIOR_OVERLAP, ViolationReason::Overlap),
        (BOUNDARY_OVERLAP, ViolationReason::SharedBoundary),
    ] {
        log::trace!("Relating {a:?} and {b:?} against {pattern}");
        match ctx.relate_pattern(a, b, pattern) {
            Ok(false) => {}
            Ok(true) => return Some(reason),
            Err(err) => return Some(ViolationReason::Undetermined(err)),
        }
    }
    None
}
