//! Defines [`GeoCollectionError`], representing all errors returned by this crate.

use thiserror::Error;

use crate::algorithm::native::validate::Violation;
use crate::datatypes::GeometryKind;
use crate::engine::EngineError;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoCollectionError {
    /// An element could not be converted into a member of the requested collection.
    #[error("Invalid element at index {index}: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: ElementError,
    },

    /// The members converted, but do not form a valid collection together.
    #[error("Invalid arrangement: {0}")]
    InvalidArrangement(#[from] ArrangementError),

    /// An engine primitive failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Incorrect geometry type for operation
    #[error("Incorrect geometry type for operation: {0}")]
    IncorrectGeometryType(String),

    /// Factory configuration could not be parsed.
    #[error("Invalid factory configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Why a single caller element was rejected.
#[derive(Error, Debug)]
pub enum ElementError {
    #[error("expected a {expected}, found a {found}")]
    KindMismatch {
        expected: GeometryKind,
        found: GeometryKind,
    },

    #[error("invalid nested collection: {0}")]
    Nested(Box<GeoCollectionError>),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Why converted members could not be assembled into a collection.
#[derive(Error, Debug)]
pub enum ArrangementError {
    #[error("engine failed to assemble the collection: {0}")]
    Assembly(EngineError),

    #[error(transparent)]
    Topology(#[from] Violation),
}

impl From<ElementError> for GeoCollectionError {
    fn from(value: ElementError) -> Self {
        match value {
            ElementError::KindMismatch { expected, found } => GeoCollectionError::IncorrectGeometryType(
                format!("expected a {expected}, found a {found}"),
            ),
            ElementError::Nested(err) => *err,
            ElementError::Engine(err) => GeoCollectionError::Engine(err),
        }
    }
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoCollectionError>;
