//! Owned geometry collections (GeometryCollection, MultiPoint, MultiLineString and
//! MultiPolygon) built on top of a small handle-based geometry engine.
//!
//! Collections are constructed atomically from loosely typed [`Element`]s, MultiPolygons are
//! checked for overlapping members, and any two collections can be compared structurally with
//! a three-valued [`Equality`] result.
//!
//! ```
//! use geocollection::{Factory, FactoryConfig};
//!
//! let factory = Factory::new(FactoryConfig::default());
//! let a = factory.point((0., 0.)).unwrap();
//! let b = factory.point((1., 1.)).unwrap();
//! let multi_point = factory.multi_point([a, b]).unwrap();
//!
//! assert_eq!(multi_point.num_geometries(), 2);
//! assert!(multi_point.get(-1).is_some());
//! assert!(multi_point.get(2).is_none());
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use algorithm::native::eq::Equality;
pub use datatypes::{CollectionKind, Dimension, GeometryKind};
pub use error::{GeoCollectionError, Result};
pub use factory::{Factory, FactoryConfig};
pub use io::Element;
pub use scalar::{
    Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Subtype,
};

pub mod algorithm;
pub mod datatypes;
pub mod engine;
pub mod error;
pub mod factory;
pub mod io;
pub mod scalar;
#[cfg(test)]
pub(crate) mod test;
