//! GeoServer layers rendered through the map runtime.
//!
//! WMS layers only need a tile URL template, so they are registered without
//! any network I/O. WFS layers are fetched first, as GeoJSON with a GML2
//! fallback, and then handed to the map as a GeoJSON source.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use map_runtime::layers::{add_geojson, add_wms_layer as add_raster_layer};
use map_runtime::{
    fit_bounds, property_map, GeoJsonLayerConfig, LayerType, MapError, MapHandle, PropertyMap, Reconciled,
    SharedMap, WmsLayerConfig,
};
use ogc_common::{FeatureCollection, GeoServerError, GeoServerResult, QualifiedName};
use ogc_protocol::{build_wms_url, parse_gml, WfsParams, WmsUrlParams};

use crate::client::GeoServerClient;

/// Error from a fetch-then-render integration call.
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error(transparent)]
    GeoServer(#[from] GeoServerError),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Result type alias using IntegrationError.
pub type IntegrationResult<T> = Result<T, IntegrationError>;

/// A GeoServer WMS layer to show as raster tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoServerWmsLayer {
    pub id: String,
    /// GeoServer root URL; `/wms` is appended.
    pub geoserver_url: String,
    pub workspace: String,
    pub layer_name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub transparent: Option<bool>,
    #[serde(default)]
    pub styles: Option<String>,
    #[serde(default)]
    pub cql_filter: Option<String>,
    #[serde(default)]
    pub before_id: Option<String>,
}

impl GeoServerWmsLayer {
    pub fn new(
        id: impl Into<String>,
        geoserver_url: impl Into<String>,
        workspace: impl Into<String>,
        layer_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            geoserver_url: geoserver_url.into(),
            workspace: workspace.into(),
            layer_name: layer_name.into(),
            format: None,
            transparent: None,
            styles: None,
            cql_filter: None,
            before_id: None,
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(&self.workspace, &self.layer_name)
    }

    /// GetMap parameters for the tile template, in EPSG:3857.
    pub fn url_params(&self) -> WmsUrlParams {
        let mut params = WmsUrlParams::new(&self.geoserver_url, self.qualified_name().to_string())
            .with_srs("EPSG:3857")
            .with_transparent(self.transparent.unwrap_or(true));
        if let Some(format) = &self.format {
            params = params.with_format(format);
        }
        params.styles = self.styles.clone();
        params.cql_filter = self.cql_filter.clone();
        params
    }
}

/// A GeoServer WFS feature type to show as a GeoJSON layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoServerWfsLayer {
    pub id: String,
    /// Falls back to the client's configured workspace.
    #[serde(default)]
    pub workspace: Option<String>,
    pub type_name: String,
    #[serde(default)]
    pub max_features: Option<u32>,
    #[serde(default)]
    pub cql_filter: Option<String>,
    #[serde(default)]
    pub paint: Option<PropertyMap>,
    #[serde(default)]
    pub layout: Option<PropertyMap>,
    #[serde(default)]
    pub before_id: Option<String>,
    /// Fit the camera to the loaded features once they are rendered.
    #[serde(default)]
    pub fit_bounds: bool,
}

impl GeoServerWfsLayer {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            workspace: None,
            type_name: type_name.into(),
            max_features: None,
            cql_filter: None,
            paint: None,
            layout: None,
            before_id: None,
            fit_bounds: false,
        }
    }

    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// An explicit `workspace` always yields `workspace:type_name`. The
    /// client's default workspace only applies to a `type_name` without one.
    pub fn qualified_name(&self, default_workspace: Option<&str>) -> QualifiedName {
        match &self.workspace {
            Some(workspace) => QualifiedName::new(workspace, &self.type_name),
            None => QualifiedName::parse_with_default(&self.type_name, default_workspace),
        }
    }

    /// GetFeature parameters in EPSG:4326.
    pub fn wfs_params(&self, default_workspace: Option<&str>) -> WfsParams {
        let mut params =
            WfsParams::new(self.qualified_name(default_workspace).to_string()).with_srs("EPSG:4326");
        params.max_features = self.max_features;
        params.cql_filter = self.cql_filter.clone();
        params
    }
}

fn default_wfs_paint() -> PropertyMap {
    property_map(json!({
        "fill-color": "#627BC1",
        "fill-opacity": 0.8,
        "fill-outline-color": "#ffffff",
    }))
}

fn default_wfs_layout() -> PropertyMap {
    property_map(json!({"visibility": "visible"}))
}

/// Register a WMS layer as a raster source/layer pair. No network I/O.
pub fn add_wms_layer<M: MapHandle + ?Sized>(
    map: &mut M,
    layer: &GeoServerWmsLayer,
) -> IntegrationResult<Reconciled> {
    let config = WmsLayerConfig {
        id: layer.id.clone(),
        tile_url: build_wms_url(&layer.url_params()),
        before_id: layer.before_id.clone(),
    };

    match add_raster_layer(map, &config) {
        Ok(outcome) => {
            info!(layer_id = %layer.id, layer = %layer.qualified_name(), "Added GeoServer WMS layer");
            Ok(outcome)
        }
        Err(e) => {
            error!(layer_id = %layer.id, error = %e, "Failed to add GeoServer WMS layer");
            Err(e.into())
        }
    }
}

/// Fetch as GeoJSON, falling back to GML2 when the JSON request fails for
/// any reason. The GML error is returned when both fail.
pub async fn fetch_features_with_fallback(
    client: &GeoServerClient,
    params: &WfsParams,
) -> GeoServerResult<FeatureCollection> {
    match client.fetch_features(params).await {
        Ok(collection) => Ok(collection),
        Err(json_error) => {
            warn!(
                type_name = %params.type_name,
                error = %json_error,
                "GeoJSON request failed, trying GML"
            );
            let xml = client.fetch_features_gml(params).await?;
            parse_gml(&xml)
        }
    }
}

/// Fetch a WFS layer and render it. Returns the number of features shown.
///
/// Nothing is rendered when both formats fail.
#[instrument(skip(client, map, layer), fields(layer_id = %layer.id))]
pub async fn add_wfs_layer<M: MapHandle + ?Sized>(
    client: &GeoServerClient,
    map: &mut M,
    layer: &GeoServerWfsLayer,
) -> IntegrationResult<usize> {
    let collection = fetch_layer(client, layer).await?;
    render_wfs_layer(map, layer, collection)
}

/// [`add_wfs_layer`] against a shared map, holding the layer id's lock from
/// the fetch until the render completes.
///
/// Concurrent calls for one id therefore apply in lock order and the last
/// one to acquire the lock decides the final state.
#[instrument(skip(client, map, layer), fields(layer_id = %layer.id))]
pub async fn add_wfs_layer_shared<M: MapHandle>(
    client: &GeoServerClient,
    map: &SharedMap<M>,
    layer: &GeoServerWfsLayer,
) -> IntegrationResult<usize> {
    let _id_guard = map.lock_id(&layer.id).await;
    let collection = fetch_layer(client, layer).await?;
    let mut map = map.map().await;
    render_wfs_layer(&mut *map, layer, collection)
}

async fn fetch_layer(
    client: &GeoServerClient,
    layer: &GeoServerWfsLayer,
) -> IntegrationResult<FeatureCollection> {
    let params = layer.wfs_params(client.config().workspace.as_deref());
    fetch_features_with_fallback(client, &params)
        .await
        .map_err(|e| {
            error!(layer_id = %layer.id, error = %e, "Failed to load GeoServer WFS layer");
            e.into()
        })
}

fn render_wfs_layer<M: MapHandle + ?Sized>(
    map: &mut M,
    layer: &GeoServerWfsLayer,
    collection: FeatureCollection,
) -> IntegrationResult<usize> {
    let features = collection.len();
    let bounds = if layer.fit_bounds {
        collection.bounds()
    } else {
        None
    };
    let config = GeoJsonLayerConfig {
        id: layer.id.clone(),
        data: collection.into(),
        layer_type: LayerType::Fill,
        paint: Some(layer.paint.clone().unwrap_or_else(default_wfs_paint)),
        layout: Some(layer.layout.clone().unwrap_or_else(default_wfs_layout)),
        before_id: layer.before_id.clone(),
    };

    add_geojson(map, &config).map_err(|e| {
        error!(layer_id = %layer.id, error = %e, "Failed to render GeoServer WFS layer");
        IntegrationError::from(e)
    })?;

    info!(layer_id = %layer.id, features, "Added GeoServer WFS layer");
    // An empty collection has no extent, so the camera stays put.
    if let Some(bounds) = bounds {
        fit_bounds(map, &bounds, None);
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogc_protocol::BBOX_PLACEHOLDER;

    #[test]
    fn test_wms_template_uses_qualified_name() {
        let mut layer = GeoServerWmsLayer::new("roads", "http://gs/geoserver", "ws", "roads");
        layer.cql_filter = Some("type='primary'".to_string());
        let url = build_wms_url(&layer.url_params());
        assert!(url.starts_with("http://gs/geoserver/wms?"));
        assert!(url.contains("layers=ws%3Aroads"));
        assert!(url.contains("cql_filter=type%3D%27primary%27"));
        assert!(url.ends_with(BBOX_PLACEHOLDER));
    }

    #[test]
    fn test_wfs_params_qualification() {
        let layer = GeoServerWfsLayer::new("s", "states");
        assert_eq!(layer.wfs_params(Some("topp")).type_name, "topp:states");
        assert_eq!(layer.wfs_params(None).type_name, "states");

        let layer = layer.with_workspace("census");
        assert_eq!(layer.wfs_params(Some("topp")).type_name, "census:states");
        assert_eq!(layer.wfs_params(None).srs, "EPSG:4326");
    }

    #[test]
    fn test_default_workspace_skips_qualified_type_names() {
        let layer = GeoServerWfsLayer::new("s", "topp:states");
        assert_eq!(layer.wfs_params(Some("city")).type_name, "topp:states");
        assert_eq!(layer.wfs_params(None).type_name, "topp:states");

        let layer = layer.with_workspace("census");
        assert_eq!(layer.wfs_params(Some("city")).type_name, "census:topp:states");
    }
}
