//! One-call builders pairing a source with its layer.
//!
//! Each builder derives the source id with [`source_id_for`], then runs
//! [`ensure_source`] and [`ensure_layer`], so calling it again updates the
//! existing pair.

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::error::MapResult;
use crate::handle::MapHandle;
use crate::runtime::{ensure_layer, ensure_source, source_id_for, Reconciled};
use crate::style::{property_map, GeoJsonData, LayerSpec, LayerType, PropertyMap, SourceSpec};

/// A GeoJSON source with one layer over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoJsonLayerConfig {
    pub id: String,
    pub data: GeoJsonData,
    pub layer_type: LayerType,
    /// Defaults to a teal fill when unset.
    pub paint: Option<PropertyMap>,
    pub layout: Option<PropertyMap>,
    pub before_id: Option<String>,
}

impl GeoJsonLayerConfig {
    pub fn new(id: impl Into<String>, data: impl Into<GeoJsonData>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            layer_type: LayerType::Fill,
            paint: None,
            layout: None,
            before_id: None,
        }
    }
}

/// A vector tile source (e.g. GeoServer MVT) with one layer over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorTileLayerConfig {
    pub id: String,
    pub tiles: Vec<String>,
    pub source_layer: String,
    /// Feature property used as the feature id.
    pub promote_id: Option<String>,
    pub layer_type: LayerType,
    pub paint: Option<PropertyMap>,
    pub layout: Option<PropertyMap>,
    pub before_id: Option<String>,
}

impl VectorTileLayerConfig {
    pub fn new(
        id: impl Into<String>,
        tiles: Vec<String>,
        source_layer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tiles,
            source_layer: source_layer.into(),
            promote_id: None,
            layer_type: LayerType::Fill,
            paint: None,
            layout: None,
            before_id: None,
        }
    }
}

/// A raster source from a tile URL template, such as the one produced by
/// `ogc_protocol::build_wms_url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmsLayerConfig {
    pub id: String,
    pub tile_url: String,
    pub before_id: Option<String>,
}

impl WmsLayerConfig {
    pub fn new(id: impl Into<String>, tile_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tile_url: tile_url.into(),
            before_id: None,
        }
    }
}

fn default_fill_paint() -> PropertyMap {
    property_map(json!({"fill-color": "#088", "fill-opacity": 0.8}))
}

/// Add or update a GeoJSON layer. Returns what happened to the layer.
pub fn add_geojson<M: MapHandle + ?Sized>(
    map: &mut M,
    config: &GeoJsonLayerConfig,
) -> MapResult<Reconciled> {
    let source_id = source_id_for(&config.id);
    ensure_source(map, &source_id, &SourceSpec::geojson(config.data.clone()))?;

    let layer = LayerSpec::new(&config.id, config.layer_type, &source_id)
        .with_paint(config.paint.clone().unwrap_or_else(default_fill_paint))
        .with_layout(config.layout.clone().unwrap_or_default());
    let outcome = ensure_layer(map, &layer, config.before_id.as_deref())?;

    info!(layer_id = %config.id, outcome = ?outcome, "GeoJSON layer ready");
    Ok(outcome)
}

/// Add or update a vector tile layer.
pub fn add_vector_tile_layer<M: MapHandle + ?Sized>(
    map: &mut M,
    config: &VectorTileLayerConfig,
) -> MapResult<Reconciled> {
    let source_id = source_id_for(&config.id);
    let source = SourceSpec::Vector {
        tiles: config.tiles.clone(),
        promote_id: config.promote_id.clone(),
    };
    ensure_source(map, &source_id, &source)?;

    let layer = LayerSpec::new(&config.id, config.layer_type, &source_id)
        .with_source_layer(&config.source_layer)
        .with_paint(config.paint.clone().unwrap_or_else(default_fill_paint))
        .with_layout(config.layout.clone().unwrap_or_default());
    let outcome = ensure_layer(map, &layer, config.before_id.as_deref())?;

    info!(layer_id = %config.id, outcome = ?outcome, "Vector tile layer ready");
    Ok(outcome)
}

/// Add or update a WMS raster layer.
pub fn add_wms_layer<M: MapHandle + ?Sized>(
    map: &mut M,
    config: &WmsLayerConfig,
) -> MapResult<Reconciled> {
    let source_id = source_id_for(&config.id);
    let source = SourceSpec::Raster {
        tiles: vec![config.tile_url.clone()],
        tile_size: 256,
    };
    ensure_source(map, &source_id, &source)?;

    let layer = LayerSpec::new(&config.id, LayerType::Raster, &source_id)
        .with_paint(property_map(json!({"raster-opacity": 1})));
    let outcome = ensure_layer(map, &layer, config.before_id.as_deref())?;

    info!(layer_id = %config.id, outcome = ?outcome, "WMS layer ready");
    Ok(outcome)
}
