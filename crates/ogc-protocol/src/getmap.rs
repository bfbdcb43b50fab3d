//! WMS GetMap tile URL templates.
//!
//! The map renderer requests raster tiles by substituting each tile's extent
//! into the `bbox` placeholder, so the builder emits a template rather than
//! a ready-to-fetch URL.

use serde::{Deserialize, Serialize};

/// Token substituted per tile by the renderer with the tile's EPSG:3857 extent.
pub const BBOX_PLACEHOLDER: &str = "{bbox-epsg-3857}";

/// Parameters for one GetMap tile URL template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WmsUrlParams {
    /// GeoServer base URL (`http://host:8080/geoserver`); `/wms` is appended.
    pub base: String,
    /// Layer name, usually workspace-qualified (`ws:roads`).
    pub layer: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_transparent")]
    pub transparent: bool,
    #[serde(default = "default_srs")]
    pub srs: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_tile_size")]
    pub width: u32,
    #[serde(default = "default_tile_size")]
    pub height: u32,
    #[serde(default)]
    pub styles: Option<String>,
    #[serde(default)]
    pub cql_filter: Option<String>,
}

fn default_format() -> String {
    "image/png".to_string()
}

fn default_transparent() -> bool {
    true
}

fn default_srs() -> String {
    "EPSG:3857".to_string()
}

fn default_version() -> String {
    "1.1.1".to_string()
}

fn default_tile_size() -> u32 {
    256
}

impl WmsUrlParams {
    /// Parameters with every default applied.
    pub fn new(base: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            layer: layer.into(),
            format: default_format(),
            transparent: default_transparent(),
            srs: default_srs(),
            version: default_version(),
            width: default_tile_size(),
            height: default_tile_size(),
            styles: None,
            cql_filter: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = srs.into();
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = Some(styles.into());
        self
    }

    pub fn with_cql_filter(mut self, cql_filter: impl Into<String>) -> Self {
        self.cql_filter = Some(cql_filter.into());
        self
    }
}

/// Build a GetMap tile URL template.
///
/// Values are percent-encoded. `styles` and `cql_filter` appear only when
/// set. The bbox placeholder is appended last, unencoded. The layer name is
/// not validated.
pub fn build_wms_url(params: &WmsUrlParams) -> String {
    let width = params.width.to_string();
    let height = params.height.to_string();

    let mut pairs: Vec<(&str, &str)> = vec![
        ("service", "WMS"),
        ("version", params.version.as_str()),
        ("request", "GetMap"),
        ("layers", params.layer.as_str()),
        ("format", params.format.as_str()),
        ("transparent", if params.transparent { "true" } else { "false" }),
        ("srs", params.srs.as_str()),
        ("width", width.as_str()),
        ("height", height.as_str()),
    ];
    if let Some(styles) = params.styles.as_deref() {
        pairs.push(("styles", styles));
    }
    if let Some(cql_filter) = params.cql_filter.as_deref() {
        pairs.push(("cql_filter", cql_filter));
    }

    format!(
        "{}/wms?{}&bbox={}",
        params.base.trim_end_matches('/'),
        encode_query(&pairs),
        BBOX_PLACEHOLDER
    )
}

/// Percent-encode `key=value` pairs joined by `&`.
pub(crate) fn encode_query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_encoding() {
        let url = build_wms_url(&WmsUrlParams::new("http://gs", "ws:roads"));
        assert_eq!(
            url,
            "http://gs/wms?service=WMS&version=1.1.1&request=GetMap&layers=ws%3Aroads\
             &format=image%2Fpng&transparent=true&srs=EPSG%3A3857&width=256&height=256\
             &bbox={bbox-epsg-3857}"
        );
    }

    #[test]
    fn test_optional_params_omitted_when_absent() {
        let url = build_wms_url(&WmsUrlParams::new("http://gs", "ws:roads"));
        assert!(!url.contains("styles="));
        assert!(!url.contains("cql_filter="));
    }

    #[test]
    fn test_optional_params_appended_before_bbox() {
        let params = WmsUrlParams::new("http://gs/", "ws:roads")
            .with_styles("line")
            .with_cql_filter("type = 'primary'")
            .with_transparent(false);
        let url = build_wms_url(&params);
        assert!(url.starts_with("http://gs/wms?"));
        assert!(url.contains("transparent=false"));
        assert!(url.contains("&styles=line&cql_filter=type%20%3D%20%27primary%27&bbox="));
        assert!(url.ends_with(BBOX_PLACEHOLDER));
    }

    #[test]
    fn test_deterministic() {
        let params = WmsUrlParams::new("http://gs", "ws:roads").with_styles("s");
        assert_eq!(build_wms_url(&params), build_wms_url(&params));
    }
}
