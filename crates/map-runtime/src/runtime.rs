//! Create-or-patch reconciliation of sources and layers.

use serde_json::Value;
use tracing::{debug, error, warn};

use ogc_common::BoundingBox;

use crate::camera::{FitBoundsOptions, FlyToOptions, ViewportConfig};
use crate::error::MapResult;
use crate::handle::MapHandle;
use crate::style::{LayerSpec, SourceSpec};

/// What a reconcile call did to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Added,
    Updated,
    /// Already present and nothing applicable to patch.
    Unchanged,
}

/// Backing source id for a declared layer id.
pub fn source_id_for(id: &str) -> String {
    format!("{}-source", id)
}

/// Create the source if absent.
///
/// An existing GeoJSON source has its data replaced in place. An existing
/// vector or raster source is left as is; changing its tiles requires
/// [`remove_layer`] followed by a fresh add.
pub fn ensure_source<M: MapHandle + ?Sized>(
    map: &mut M,
    source_id: &str,
    source: &SourceSpec,
) -> MapResult<Reconciled> {
    if !map.has_source(source_id) {
        map.add_source(source_id, source)?;
        debug!(source_id = %source_id, kind = source.kind(), "Added source");
        return Ok(Reconciled::Added);
    }

    match source {
        SourceSpec::Geojson { data } => {
            map.set_geojson_data(source_id, data)?;
            debug!(source_id = %source_id, "Updated GeoJSON source");
            Ok(Reconciled::Updated)
        }
        SourceSpec::Vector { .. } | SourceSpec::Raster { .. } => Ok(Reconciled::Unchanged),
    }
}

/// Create the layer if absent, otherwise patch the supplied properties.
///
/// Patching merges: every property in `layer.paint` and `layer.layout` is
/// set individually and properties not mentioned keep their live value.
pub fn ensure_layer<M: MapHandle + ?Sized>(
    map: &mut M,
    layer: &LayerSpec,
    before_id: Option<&str>,
) -> MapResult<Reconciled> {
    if !map.has_layer(&layer.id) {
        map.add_layer(layer, before_id)?;
        debug!(
            layer_id = %layer.id,
            before_id = ?before_id,
            "Added layer"
        );
        return Ok(Reconciled::Added);
    }

    for (name, value) in &layer.paint {
        map.set_paint_property(&layer.id, name, value)?;
    }
    for (name, value) in &layer.layout {
        map.set_layout_property(&layer.id, name, value)?;
    }

    if layer.paint.is_empty() && layer.layout.is_empty() {
        return Ok(Reconciled::Unchanged);
    }
    debug!(
        layer_id = %layer.id,
        paint = layer.paint.len(),
        layout = layer.layout.len(),
        "Updated layer"
    );
    Ok(Reconciled::Updated)
}

/// Show or hide a layer. A missing layer is logged and ignored.
pub fn set_layer_visibility<M: MapHandle + ?Sized>(map: &mut M, layer_id: &str, visible: bool) {
    if !map.has_layer(layer_id) {
        warn!(layer_id = %layer_id, "Layer not found, visibility unchanged");
        return;
    }

    let value = Value::from(if visible { "visible" } else { "none" });
    match map.set_layout_property(layer_id, "visibility", &value) {
        Ok(()) => debug!(layer_id = %layer_id, visible, "Set layer visibility"),
        Err(e) => error!(layer_id = %layer_id, error = %e, "Failed to set layer visibility"),
    }
}

/// Move a layer below `before_id`, or to the top. A missing layer is logged
/// and ignored.
pub fn set_layer_order<M: MapHandle + ?Sized>(
    map: &mut M,
    layer_id: &str,
    before_id: Option<&str>,
) {
    if !map.has_layer(layer_id) {
        warn!(layer_id = %layer_id, "Layer not found, order unchanged");
        return;
    }

    match map.move_layer(layer_id, before_id) {
        Ok(()) => debug!(
            layer_id = %layer_id,
            before_id = before_id.unwrap_or("top"),
            "Moved layer"
        ),
        Err(e) => error!(layer_id = %layer_id, error = %e, "Failed to reorder layer"),
    }
}

/// Remove a layer and then its `{id}-source`. Either may already be gone.
pub fn remove_layer<M: MapHandle + ?Sized>(map: &mut M, layer_id: &str) -> MapResult<()> {
    if map.has_layer(layer_id) {
        map.remove_layer(layer_id)?;
        debug!(layer_id = %layer_id, "Removed layer");
    }

    let source_id = source_id_for(layer_id);
    if map.has_source(&source_id) {
        map.remove_source(&source_id)?;
        debug!(source_id = %source_id, "Removed source");
    }
    Ok(())
}

/// Start a camera flight. Fire and forget: failures are logged only.
pub fn fly_to<M: MapHandle + ?Sized>(map: &mut M, viewport: &ViewportConfig) {
    let options = FlyToOptions::from(viewport);
    match map.fly_to(&options) {
        Ok(()) => debug!(lng = viewport.lng, lat = viewport.lat, "Flying to location"),
        Err(e) => error!(error = %e, "Failed to fly to location"),
    }
}

/// Animate the viewport to `bounds`. Fire and forget: failures are logged only.
pub fn fit_bounds<M: MapHandle + ?Sized>(
    map: &mut M,
    bounds: &BoundingBox,
    options: Option<FitBoundsOptions>,
) {
    let options = options.unwrap_or_default();
    match map.fit_bounds(bounds, &options) {
        Ok(()) => debug!(bbox = %bounds.to_wms_string(), "Fitted bounds"),
        Err(e) => error!(error = %e, "Failed to fit bounds"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_derivation() {
        assert_eq!(source_id_for("roads"), "roads-source");
        assert_eq!(source_id_for(""), "-source");
    }
}
