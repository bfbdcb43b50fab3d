//! Map runtime: reconciles declarative source/layer descriptions against a
//! live, externally owned map.
//!
//! The map itself is the only state. Every operation reads existence through
//! [`MapHandle`] and then either creates or patches in place, so calling the
//! same operation twice converges instead of duplicating.

pub mod camera;
pub mod error;
pub mod handle;
pub mod layers;
pub mod runtime;
pub mod shared;
pub mod style;

pub use camera::{FitBoundsOptions, FlyToOptions, ViewportConfig};
pub use error::{MapError, MapResult};
pub use handle::MapHandle;
pub use layers::{
    add_geojson, add_vector_tile_layer, add_wms_layer, GeoJsonLayerConfig, VectorTileLayerConfig,
    WmsLayerConfig,
};
pub use runtime::{
    ensure_layer, ensure_source, fit_bounds, fly_to, remove_layer, set_layer_order,
    set_layer_visibility, source_id_for, Reconciled,
};
pub use shared::{IdGuard, SharedMap};
pub use style::{property_map, GeoJsonData, LayerSpec, LayerType, PropertyMap, SourceSpec};
