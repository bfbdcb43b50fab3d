//! The map collaborator seam.

use serde_json::Value;

use ogc_common::BoundingBox;

use crate::camera::{FitBoundsOptions, FlyToOptions};
use crate::error::MapResult;
use crate::style::{GeoJsonData, LayerSpec, SourceSpec};

/// The subset of a Mapbox GL style map the runtime drives.
///
/// Implementations wrap a live renderer (or a test double). State lives in
/// the implementation; the runtime never keeps a shadow copy, which is why
/// every reconcile starts with `has_source`/`has_layer`.
pub trait MapHandle {
    fn has_source(&self, source_id: &str) -> bool;

    fn add_source(&mut self, source_id: &str, source: &SourceSpec) -> MapResult<()>;

    /// In-place data swap on an existing GeoJSON source (`setData`).
    fn set_geojson_data(&mut self, source_id: &str, data: &GeoJsonData) -> MapResult<()>;

    fn remove_source(&mut self, source_id: &str) -> MapResult<()>;

    fn has_layer(&self, layer_id: &str) -> bool;

    /// Insert a layer directly below `before_id` in paint order, or on top
    /// when `before_id` is `None`.
    fn add_layer(&mut self, layer: &LayerSpec, before_id: Option<&str>) -> MapResult<()>;

    fn remove_layer(&mut self, layer_id: &str) -> MapResult<()>;

    fn set_layout_property(&mut self, layer_id: &str, name: &str, value: &Value)
        -> MapResult<()>;

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: &Value) -> MapResult<()>;

    fn move_layer(&mut self, layer_id: &str, before_id: Option<&str>) -> MapResult<()>;

    /// Start a camera animation. Returns once the animation is scheduled.
    fn fly_to(&mut self, options: &FlyToOptions) -> MapResult<()>;

    fn fit_bounds(&mut self, bounds: &BoundingBox, options: &FitBoundsOptions) -> MapResult<()>;
}
