//! Source and layer descriptions in the Mapbox GL style shape.
//!
//! These serialize to the JSON objects `addSource`/`addLayer` accept, so a
//! [`MapHandle`](crate::MapHandle) backed by a real renderer can forward them
//! without translation.

use serde::Serialize;
use serde_json::{Map, Value};

use ogc_common::{Feature, FeatureCollection};

/// Paint or layout properties, keyed by style property name.
pub type PropertyMap = Map<String, Value>;

/// Property map from a JSON object literal; anything else yields an empty map.
pub fn property_map(value: Value) -> PropertyMap {
    match value {
        Value::Object(map) => map,
        _ => PropertyMap::new(),
    }
}

/// Data accepted by a GeoJSON source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeoJsonData {
    Collection(FeatureCollection),
    Feature(Feature),
    /// URL the renderer fetches itself.
    Url(String),
}

impl From<FeatureCollection> for GeoJsonData {
    fn from(collection: FeatureCollection) -> Self {
        GeoJsonData::Collection(collection)
    }
}

impl From<Feature> for GeoJsonData {
    fn from(feature: Feature) -> Self {
        GeoJsonData::Feature(feature)
    }
}

/// A map source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    Geojson {
        data: GeoJsonData,
    },
    Vector {
        tiles: Vec<String>,
        #[serde(rename = "promoteId", skip_serializing_if = "Option::is_none")]
        promote_id: Option<String>,
    },
    Raster {
        tiles: Vec<String>,
        #[serde(rename = "tileSize")]
        tile_size: u32,
    },
}

impl SourceSpec {
    pub fn geojson(data: impl Into<GeoJsonData>) -> Self {
        SourceSpec::Geojson { data: data.into() }
    }

    /// Style `type` of the source.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceSpec::Geojson { .. } => "geojson",
            SourceSpec::Vector { .. } => "vector",
            SourceSpec::Raster { .. } => "raster",
        }
    }
}

/// Style layer types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    Fill,
    Line,
    Circle,
    Symbol,
    Raster,
    FillExtrusion,
    Heatmap,
}

/// A style layer bound to one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub source: String,
    /// Layer inside a vector tile source.
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub paint: PropertyMap,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub layout: PropertyMap,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, layer_type: LayerType, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer_type,
            source: source.into(),
            source_layer: None,
            paint: PropertyMap::new(),
            layout: PropertyMap::new(),
        }
    }

    pub fn with_source_layer(mut self, source_layer: impl Into<String>) -> Self {
        self.source_layer = Some(source_layer.into());
        self
    }

    pub fn with_paint(mut self, paint: PropertyMap) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_layout(mut self, layout: PropertyMap) -> Self {
        self.layout = layout;
        self
    }
}
