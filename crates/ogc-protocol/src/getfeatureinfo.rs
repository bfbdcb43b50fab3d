//! WMS GetFeatureInfo queries.
//!
//! Asks GeoServer which features of a rendered WMS layer lie under one pixel
//! of a map image. Pixel coordinates are relative to the image described by
//! `bbox`, `width` and `height`, with the origin at the top left.

use serde::{Deserialize, Serialize};

use ogc_common::BoundingBox;

use crate::getmap::encode_query;

/// Response format requested from GeoServer; the answer is a GeoJSON
/// FeatureCollection.
pub const INFO_FORMAT: &str = "application/json";

/// GetFeatureInfo request parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfoParams {
    /// Layers drawn in the image (same as GetMap).
    pub layers: String,
    /// Layers to query; `None` queries every drawn layer.
    #[serde(default)]
    pub query_layers: Option<String>,
    #[serde(default)]
    pub styles: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_srs")]
    pub srs: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Extent of the image, in `srs` units.
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
    /// Pixel column, 0-based from the left.
    pub x: u32,
    /// Pixel row, 0-based from the top.
    pub y: u32,
    /// Maximum number of features to return; GeoServer's default is 1.
    #[serde(default)]
    pub feature_count: Option<u32>,
}

fn default_format() -> String {
    "image/png".to_string()
}

fn default_srs() -> String {
    "EPSG:3857".to_string()
}

fn default_version() -> String {
    "1.1.1".to_string()
}

impl FeatureInfoParams {
    pub fn new(
        layers: impl Into<String>,
        bbox: BoundingBox,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
    ) -> Self {
        Self {
            layers: layers.into(),
            query_layers: None,
            styles: String::new(),
            format: default_format(),
            srs: default_srs(),
            version: default_version(),
            bbox,
            width,
            height,
            x,
            y,
            feature_count: None,
        }
    }

    pub fn with_query_layers(mut self, query_layers: impl Into<String>) -> Self {
        self.query_layers = Some(query_layers.into());
        self
    }

    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = srs.into();
        self
    }

    pub fn with_feature_count(mut self, feature_count: u32) -> Self {
        self.feature_count = Some(feature_count);
        self
    }

    /// Layers actually queried.
    pub fn queried_layers(&self) -> &str {
        self.query_layers.as_deref().unwrap_or(&self.layers)
    }

    /// Percent-encoded query string for the `/wms` endpoint.
    pub fn to_query(&self) -> String {
        let width = self.width.to_string();
        let height = self.height.to_string();
        let bbox = self.bbox.to_wms_string();
        let x = self.x.to_string();
        let y = self.y.to_string();
        let feature_count = self.feature_count.map(|n| n.to_string());

        let mut pairs: Vec<(&str, &str)> = vec![
            ("service", "WMS"),
            ("version", self.version.as_str()),
            ("request", "GetFeatureInfo"),
            ("layers", self.layers.as_str()),
            ("query_layers", self.queried_layers()),
            ("styles", self.styles.as_str()),
            ("format", self.format.as_str()),
            ("info_format", INFO_FORMAT),
            ("srs", self.srs.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("bbox", bbox.as_str()),
            ("x", x.as_str()),
            ("y", y.as_str()),
        ];
        if let Some(feature_count) = feature_count.as_deref() {
            pairs.push(("feature_count", feature_count));
        }
        encode_query(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FeatureInfoParams {
        FeatureInfoParams::new(
            "topp:states",
            BoundingBox::new(-100.0, 30.0, -90.0, 40.0),
            512,
            256,
            10,
            20,
        )
    }

    #[test]
    fn test_query_defaults() {
        assert_eq!(
            params().to_query(),
            "service=WMS&version=1.1.1&request=GetFeatureInfo&layers=topp%3Astates\
             &query_layers=topp%3Astates&styles=&format=image%2Fpng\
             &info_format=application%2Fjson&srs=EPSG%3A3857&width=512&height=256\
             &bbox=-100%2C30%2C-90%2C40&x=10&y=20"
        );
    }

    #[test]
    fn test_query_layers_and_feature_count() {
        let params = FeatureInfoParams::new(
            "topp:states,tiger:roads",
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            256,
            256,
            0,
            0,
        )
        .with_query_layers("tiger:roads")
        .with_srs("EPSG:4326")
        .with_feature_count(5);

        assert_eq!(params.queried_layers(), "tiger:roads");
        let query = params.to_query();
        assert!(query.contains("&layers=topp%3Astates%2Ctiger%3Aroads&query_layers=tiger%3Aroads&"));
        assert!(query.contains("&srs=EPSG%3A4326&"));
        assert!(query.ends_with("&feature_count=5"));
    }
}
