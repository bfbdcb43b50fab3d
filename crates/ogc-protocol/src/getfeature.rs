//! WFS GetFeature query parameters.

use serde::{Deserialize, Serialize};

use crate::getmap::encode_query;

/// WFS `outputFormat` values understood by GeoServer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// application/json - requires the GeoServer GeoJSON output module
    #[serde(rename = "application/json")]
    #[default]
    GeoJson,
    /// GML2 - always available, used as the fallback
    #[serde(rename = "GML2")]
    Gml2,
}

impl OutputFormat {
    /// Value of the `outputFormat` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::GeoJson => "application/json",
            OutputFormat::Gml2 => "GML2",
        }
    }

    /// `Accept` header sent with the request.
    pub fn accept(&self) -> &'static str {
        match self {
            OutputFormat::GeoJson => "application/json",
            OutputFormat::Gml2 => "application/xml, text/xml",
        }
    }
}

/// Parameters for one GetFeature request.
///
/// The endpoint comes from the client this is sent through, so the same
/// value can be replayed against the GML fallback unchanged apart from
/// `output_format`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfsParams {
    /// Feature type, usually workspace-qualified (`topp:states`).
    pub type_name: String,
    #[serde(default = "default_srs")]
    pub srs: String,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub max_features: Option<u32>,
    #[serde(default)]
    pub start_index: Option<u32>,
    /// Literal W,S,E,N string, passed through as given.
    #[serde(default)]
    pub bbox: Option<String>,
    #[serde(default)]
    pub cql_filter: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_srs() -> String {
    "EPSG:4326".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl WfsParams {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            srs: default_srs(),
            output_format: OutputFormat::default(),
            max_features: None,
            start_index: None,
            bbox: None,
            cql_filter: None,
            version: default_version(),
        }
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = srs.into();
        self
    }

    pub fn with_max_features(mut self, max_features: u32) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = Some(start_index);
        self
    }

    pub fn with_bbox(mut self, bbox: impl Into<String>) -> Self {
        self.bbox = Some(bbox.into());
        self
    }

    pub fn with_cql_filter(mut self, cql_filter: impl Into<String>) -> Self {
        self.cql_filter = Some(cql_filter.into());
        self
    }

    /// Percent-encoded query string, without the leading `?`.
    ///
    /// Optional filters are omitted entirely when unset.
    pub fn to_query(&self) -> String {
        let max_features = self.max_features.map(|n| n.to_string());
        let start_index = self.start_index.map(|n| n.to_string());

        let mut pairs: Vec<(&str, &str)> = vec![
            ("service", "WFS"),
            ("version", self.version.as_str()),
            ("request", "GetFeature"),
            ("typeName", self.type_name.as_str()),
            ("outputFormat", self.output_format.as_str()),
            ("srsName", self.srs.as_str()),
        ];
        if let Some(max_features) = max_features.as_deref() {
            pairs.push(("maxFeatures", max_features));
        }
        if let Some(start_index) = start_index.as_deref() {
            pairs.push(("startIndex", start_index));
        }
        if let Some(bbox) = self.bbox.as_deref() {
            pairs.push(("bbox", bbox));
        }
        if let Some(cql_filter) = self.cql_filter.as_deref() {
            pairs.push(("cql_filter", cql_filter));
        }

        encode_query(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = WfsParams::new("topp:states").to_query();
        assert_eq!(
            query,
            "service=WFS&version=1.0.0&request=GetFeature&typeName=topp%3Astates\
             &outputFormat=application%2Fjson&srsName=EPSG%3A4326"
        );
    }

    #[test]
    fn test_optional_filters() {
        let query = WfsParams::new("topp:states")
            .with_max_features(50)
            .with_start_index(10)
            .with_bbox("-10,40,10,60")
            .with_cql_filter("PERSONS > 1000000")
            .to_query();
        assert!(query.contains("&maxFeatures=50"));
        assert!(query.contains("&startIndex=10"));
        assert!(query.contains("&bbox=-10%2C40%2C10%2C60"));
        assert!(query.contains("&cql_filter=PERSONS%20%3E%201000000"));
    }

    #[test]
    fn test_gml_variant_differs_only_in_format() {
        let json = WfsParams::new("topp:states").with_max_features(5);
        let gml = json.clone().with_output_format(OutputFormat::Gml2);
        assert_eq!(
            json.to_query().replace("application%2Fjson", "GML2"),
            gml.to_query()
        );
    }
}
