//! OGC WMS and WFS protocol code used by the GeoServer client.
//!
//! Supports:
//! - WMS 1.1.1 GetMap tile URL templates and GetCapabilities (1.1.1 and 1.3.0)
//! - WMS GetFeatureInfo queries answered as GeoJSON
//! - WFS GetCapabilities feature type listings (1.0.0 to 2.0.0)
//! - WFS 1.0.0 GetFeature queries (GeoJSON and GML2 output)
//! - A best-effort GML2 to GeoJSON converter
//!
//! Nothing in this crate performs I/O.

pub mod capabilities;
pub mod getfeature;
pub mod getfeatureinfo;
pub mod getmap;
pub mod gml;
pub mod wfs_capabilities;
pub mod xml;

pub use capabilities::{parse_capabilities, CapabilitiesLayer, GeoServerCapabilities};
pub use getfeature::{OutputFormat, WfsParams};
pub use getfeatureinfo::{FeatureInfoParams, INFO_FORMAT};
pub use getmap::{build_wms_url, WmsUrlParams, BBOX_PLACEHOLDER};
pub use gml::{parse_gml, GmlGeometryKind};
pub use wfs_capabilities::{parse_wfs_capabilities, WfsCapabilities, WfsFeatureType};
pub use xml::XmlNode;
