//! WFS GetCapabilities parsing.
//!
//! Reads the feature types a server offers from WFS 1.0.0, 1.1.0 and 2.0.0
//! documents. Namespace prefixes are dropped before walking the tree, so
//! `ows:Title` and a default-namespace `Title` read the same way.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ogc_common::{BoundingBox, GeoServerError, GeoServerResult};

use crate::capabilities::{bbox_array, corners};
use crate::xml::XmlNode;

const DOCUMENT: &str = "WFS capabilities";

/// Service metadata and feature types from a WFS capabilities document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfsCapabilities {
    pub version: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub feature_types: Vec<WfsFeatureType>,
    /// Operation names the server advertises (`GetFeature`, ...).
    pub operations: Vec<String>,
}

impl WfsCapabilities {
    pub fn feature_type(&self, name: &str) -> Option<&WfsFeatureType> {
        self.feature_types.iter().find(|t| t.name == name)
    }
}

/// One feature type advertised under `FeatureTypeList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WfsFeatureType {
    /// Qualified type name (`topp:states`).
    pub name: String,
    /// Falls back to `name`.
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,
    /// Defaults to `EPSG:4326`.
    pub default_crs: String,
    pub other_crs: Vec<String>,
    /// WGS84 extent, `[]` when absent or unreadable.
    #[serde(with = "bbox_array")]
    pub bbox: Option<BoundingBox>,
    pub output_formats: Vec<String>,
}

/// Parse a WFS GetCapabilities response.
pub fn parse_wfs_capabilities(xml: &str) -> GeoServerResult<WfsCapabilities> {
    let root = XmlNode::parse(xml, DOCUMENT)?;

    if let Some(message) = root.exception_report() {
        return Err(GeoServerError::ServiceException { message });
    }

    let root = root.into_local_names();
    if root.name != "WFS_Capabilities" {
        return Err(GeoServerError::XmlStructure {
            document: DOCUMENT,
            message: format!("expected WFS_Capabilities, found <{}>", root.name),
        });
    }

    // 1.1.0 and 2.0.0 use OWS service identification, 1.0.0 a plain Service.
    let service = root
        .first("ServiceIdentification")
        .or_else(|| root.first("Service"));
    let title = service
        .and_then(|s| s.child_text("Title"))
        .unwrap_or("GeoServer WFS")
        .to_string();
    let abstract_text = service
        .and_then(|s| s.child_text("Abstract"))
        .unwrap_or_default()
        .to_string();

    let feature_types: Vec<WfsFeatureType> = root
        .first("FeatureTypeList")
        .map(|list| {
            list.elements("FeatureType")
                .into_iter()
                .filter_map(read_feature_type)
                .collect()
        })
        .unwrap_or_default();

    debug!(feature_types = feature_types.len(), "Parsed WFS capabilities");

    Ok(WfsCapabilities {
        version: root.attr("version").map(str::to_string),
        title,
        abstract_text,
        feature_types,
        operations: operations(&root),
    })
}

fn operations(root: &XmlNode) -> Vec<String> {
    if let Some(metadata) = root.first("OperationsMetadata") {
        return metadata
            .elements("Operation")
            .into_iter()
            .filter_map(|op| op.attr("name"))
            .map(str::to_string)
            .collect();
    }
    root.first("Capability")
        .and_then(|c| c.first("Request"))
        .map(|request| request.children.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default()
}

fn read_feature_type(node: &XmlNode) -> Option<WfsFeatureType> {
    let Some(name) = node.child_text("Name") else {
        debug!("Skipping feature type without a name");
        return None;
    };

    let default_crs = ["DefaultCRS", "DefaultSRS", "SRS"]
        .into_iter()
        .find_map(|key| node.child_text(key))
        .unwrap_or("EPSG:4326")
        .to_string();

    let other_crs = node
        .elements("OtherCRS")
        .into_iter()
        .chain(node.elements("OtherSRS"))
        .map(|n| n.text.clone())
        .filter(|t| !t.is_empty())
        .collect();

    let output_formats = node
        .first("OutputFormats")
        .map(|formats| texts(formats.elements("Format")))
        .unwrap_or_default();

    Some(WfsFeatureType {
        name: name.to_string(),
        title: node.child_text("Title").unwrap_or(name).to_string(),
        abstract_text: node.child_text("Abstract").unwrap_or_default().to_string(),
        keywords: node.elements("Keywords").into_iter().flat_map(keywords).collect(),
        default_crs,
        other_crs,
        bbox: feature_type_bbox(name, node),
        output_formats,
    })
}

/// `<Keyword>` children, or the comma-separated text WFS 1.0.0 uses.
fn keywords(node: &XmlNode) -> Vec<String> {
    let nested = node.elements("Keyword");
    if !nested.is_empty() {
        return texts(nested);
    }
    node.text
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn texts(nodes: Vec<&XmlNode>) -> Vec<String> {
    nodes
        .into_iter()
        .map(|n| n.text.clone())
        .filter(|t| !t.is_empty())
        .collect()
}

fn feature_type_bbox(name: &str, node: &XmlNode) -> Option<BoundingBox> {
    let parsed = if let Some(wgs84) = node.first("WGS84BoundingBox") {
        corner_pairs(wgs84)
    } else if let Some(lat_long) = node.first("LatLongBoundingBox") {
        corners(lat_long, ["minx", "miny", "maxx", "maxy"], |n, key| {
            n.attr(key).map(str::to_string)
        })
    } else {
        return None;
    };

    match parsed {
        Ok(bbox) => Some(bbox),
        Err(reason) => {
            warn!(feature_type = %name, reason = %reason, "Ignoring unreadable feature type bounding box");
            None
        }
    }
}

/// OWS `LowerCorner` / `UpperCorner`, each holding `"x y"`.
fn corner_pairs(node: &XmlNode) -> Result<BoundingBox, String> {
    let read = |key: &str| -> Result<(f64, f64), String> {
        let raw = node
            .child_text(key)
            .ok_or_else(|| format!("missing {}", key))?;
        let mut values = raw.split_whitespace().map(str::parse::<f64>);
        match (values.next(), values.next(), values.next()) {
            (Some(Ok(x)), Some(Ok(y)), None) => Ok((x, y)),
            _ => Err(format!("{} is not a coordinate pair: '{}'", key, raw)),
        }
    };
    let (min_x, min_y) = read("LowerCorner")?;
    let (max_x, max_y) = read("UpperCorner")?;
    Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_root_rejected() {
        let err = parse_wfs_capabilities("<WMS_Capabilities/>").unwrap_err();
        assert!(matches!(err, GeoServerError::XmlStructure { .. }));
        assert!(err.to_string().contains("found <WMS_Capabilities>"));
    }

    #[test]
    fn test_missing_feature_type_list_is_empty() {
        let caps = parse_wfs_capabilities(r#"<WFS_Capabilities version="1.1.0"/>"#).unwrap();
        assert_eq!(caps.title, "GeoServer WFS");
        assert!(caps.feature_types.is_empty());
        assert!(caps.operations.is_empty());
    }

    #[test]
    fn test_corner_pairs_reject_extra_values() {
        let node = XmlNode::parse(
            "<b><LowerCorner>1 2 3</LowerCorner><UpperCorner>4 5</UpperCorner></b>",
            "test document",
        )
        .unwrap();
        assert!(corner_pairs(&node).unwrap_err().contains("LowerCorner"));
    }
}
