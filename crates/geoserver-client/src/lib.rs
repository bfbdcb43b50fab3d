//! Client for GeoServer's WMS and WFS endpoints, plus the glue that feeds
//! their results into the map runtime.

pub mod capabilities;
pub mod client;
pub mod config;
pub mod featureinfo;
pub mod integration;
pub mod wfs;

pub use capabilities::get_wms_capabilities;
pub use client::GeoServerClient;
pub use config::GeoServerConfig;
pub use integration::{
    add_wfs_layer, add_wfs_layer_shared, add_wms_layer, fetch_features_with_fallback,
    GeoServerWfsLayer, GeoServerWmsLayer, IntegrationError, IntegrationResult,
};

pub use ogc_common::{ErrorKind, GeoServerError, GeoServerResult};
pub use ogc_protocol::{
    FeatureInfoParams, GeoServerCapabilities, WfsCapabilities, WfsFeatureType, WfsParams,
};
