//! Common types shared by the GeoServer client, the OGC protocol code and the
//! map runtime.

pub mod bbox;
pub mod error;
pub mod geojson;
pub mod layer;

pub use bbox::BoundingBox;
pub use error::{ErrorKind, GeoServerError, GeoServerResult};
pub use geojson::{Feature, FeatureCollection, Geometry, Position, Properties};
pub use layer::QualifiedName;
