//! WMS GetCapabilities parsing.
//!
//! Both the 1.1.1 (`WMT_MS_Capabilities`) and 1.3.0 (`WMS_Capabilities`)
//! document shapes are read into the same summary.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ogc_common::{BoundingBox, GeoServerError, GeoServerResult};

use crate::xml::XmlNode;

const DOCUMENT: &str = "WMS capabilities";

/// Server metadata from a capabilities document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoServerCapabilities {
    /// `version` attribute of the root element, when present.
    pub version: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub layers: Vec<CapabilitiesLayer>,
}

impl GeoServerCapabilities {
    /// Look up a layer by its (qualified) name.
    pub fn layer(&self, name: &str) -> Option<&CapabilitiesLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

/// One named layer advertised by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesLayer {
    pub name: String,
    /// Falls back to `name` when the layer has no title.
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// WGS84 extent; `None` when the layer advertises none. Serialized as
    /// `[min_x, min_y, max_x, max_y]`, or `[]` when absent.
    #[serde(with = "bbox_array")]
    pub bbox: Option<BoundingBox>,
    /// Never empty: defaults to `["EPSG:4326"]`.
    pub srs: Vec<String>,
    pub queryable: bool,
    pub styles: Vec<String>,
}

/// Parse a GetCapabilities response.
pub fn parse_capabilities(xml: &str) -> GeoServerResult<GeoServerCapabilities> {
    let root = XmlNode::parse(xml, DOCUMENT)?;

    if let Some(message) = root.exception_report() {
        return Err(GeoServerError::ServiceException { message });
    }

    match root.local_name() {
        "WMT_MS_Capabilities" | "WMS_Capabilities" => {}
        other => {
            return Err(structure(format!(
                "expected WMT_MS_Capabilities or WMS_Capabilities, found <{}>",
                other
            )))
        }
    }

    let service = root.first("Service");
    let title = service
        .and_then(|s| s.child_text("Title"))
        .unwrap_or("GeoServer")
        .to_string();
    let abstract_text = service
        .and_then(|s| s.child_text("Abstract"))
        .unwrap_or_default()
        .to_string();

    let top_layer = root
        .first("Capability")
        .ok_or_else(|| structure("missing <Capability> element".to_string()))?
        .first("Layer")
        .ok_or_else(|| structure("missing top-level <Layer> element".to_string()))?;

    let layers: Vec<CapabilitiesLayer> = top_layer
        .elements("Layer")
        .into_iter()
        .filter_map(read_layer)
        .collect();

    debug!(layers = layers.len(), "Parsed WMS capabilities");

    Ok(GeoServerCapabilities {
        version: root.attr("version").map(str::to_string),
        title,
        abstract_text,
        layers,
    })
}

fn read_layer(node: &XmlNode) -> Option<CapabilitiesLayer> {
    // Unnamed layers are category containers and cannot be requested.
    let Some(name) = node.child_text("Name") else {
        debug!("Skipping capabilities layer without a name");
        return None;
    };

    let mut srs: Vec<String> = node
        .elements("SRS")
        .into_iter()
        .chain(node.elements("CRS"))
        .map(|n| n.text.clone())
        .filter(|t| !t.is_empty())
        .collect();
    if srs.is_empty() {
        srs.push("EPSG:4326".to_string());
    }

    let styles = node
        .elements("Style")
        .into_iter()
        .filter_map(|s| s.child_text("Name"))
        .map(str::to_string)
        .collect();

    Some(CapabilitiesLayer {
        name: name.to_string(),
        title: node.child_text("Title").unwrap_or(name).to_string(),
        abstract_text: node.child_text("Abstract").unwrap_or_default().to_string(),
        bbox: layer_bbox(name, node),
        srs,
        queryable: matches!(node.attr("queryable"), Some("1") | Some("true")),
        styles,
    })
}

fn layer_bbox(name: &str, node: &XmlNode) -> Option<BoundingBox> {
    let parsed = if let Some(lat_lon) = node.first("LatLonBoundingBox") {
        corners(lat_lon, ["minx", "miny", "maxx", "maxy"], |n, key| {
            n.attr(key).map(str::to_string)
        })
    } else if let Some(geographic) = node.first("EX_GeographicBoundingBox") {
        corners(
            geographic,
            [
                "westBoundLongitude",
                "southBoundLatitude",
                "eastBoundLongitude",
                "northBoundLatitude",
            ],
            |n, key| n.child_text(key).map(str::to_string),
        )
    } else {
        return None;
    };

    match parsed {
        Ok(bbox) => Some(bbox),
        Err(reason) => {
            warn!(layer = %name, reason = %reason, "Ignoring unreadable layer bounding box");
            None
        }
    }
}

pub(crate) fn corners(
    node: &XmlNode,
    keys: [&str; 4],
    read: impl Fn(&XmlNode, &str) -> Option<String>,
) -> Result<BoundingBox, String> {
    let mut values = [0.0f64; 4];
    for (value, key) in values.iter_mut().zip(keys) {
        let raw = read(node, key).ok_or_else(|| format!("missing {}", key))?;
        *value = raw
            .trim()
            .parse()
            .map_err(|_| format!("{} is not a number: '{}'", key, raw))?;
    }
    Ok(BoundingBox::new(values[0], values[1], values[2], values[3]))
}

fn structure(message: String) -> GeoServerError {
    GeoServerError::XmlStructure {
        document: DOCUMENT,
        message,
    }
}

/// Extent as a four-number array, with `[]` standing for "unknown".
pub(crate) mod bbox_array {
    use ogc_common::BoundingBox;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        bbox: &Option<BoundingBox>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bbox {
            Some(bbox) => bbox.to_array().as_slice().serialize(serializer),
            None => <&[f64]>::default().serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BoundingBox>, D::Error> {
        match Vec::<f64>::deserialize(deserializer)?.as_slice() {
            [] => Ok(None),
            [min_x, min_y, max_x, max_y] => {
                Ok(Some(BoundingBox::new(*min_x, *min_y, *max_x, *max_y)))
            }
            other => Err(D::Error::invalid_length(other.len(), &"an empty or four-number array")),
        }
    }
}
