//! Best-effort GML2 to GeoJSON conversion.
//!
//! This is a fallback for GeoServer deployments without the GeoJSON output
//! module. It is NOT a conformant GML reader:
//!
//! - Only `gml:Point` geometries are converted. A feature whose geometry is
//!   any other kind (LineString, Polygon, Multi*) is dropped from the output
//!   together with its properties, without an error.
//! - Only flat text properties are kept. Nested or attributed elements are
//!   ignored.
//!
//! Geometry handling dispatches on [`GmlGeometryKind`], so supporting another
//! geometry means adding one match arm in `extract_geometry`.

use serde_json::Value;
use tracing::{debug, info, warn};

use ogc_common::{
    Feature, FeatureCollection, GeoServerError, GeoServerResult, Geometry, Properties,
};

use crate::xml::XmlNode;

const DOCUMENT: &str = "GML";

/// GML geometry elements the converter recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GmlGeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    MultiGeometry,
}

impl GmlGeometryKind {
    /// Recognise a `gml:`-prefixed geometry element name.
    pub fn from_element(name: &str) -> Option<Self> {
        match name.strip_prefix("gml:")? {
            "Point" => Some(Self::Point),
            "MultiPoint" => Some(Self::MultiPoint),
            "LineString" => Some(Self::LineString),
            "MultiLineString" => Some(Self::MultiLineString),
            "Polygon" => Some(Self::Polygon),
            "MultiPolygon" => Some(Self::MultiPolygon),
            "MultiGeometry" => Some(Self::MultiGeometry),
            _ => None,
        }
    }
}

enum Extraction {
    Geometry(Geometry),
    Unsupported(GmlGeometryKind),
    Invalid(String),
}

/// Convert a WFS GML2 response into a FeatureCollection.
///
/// Two dialects are accepted: `wfs:FeatureCollection` with `gml:featureMember`
/// children, and an unprefixed `FeatureCollection` with `featureMember`
/// children. Malformed XML is [`GeoServerError::XmlParse`]; a well-formed
/// document with a different root is [`GeoServerError::XmlStructure`], or
/// [`GeoServerError::ServiceException`] when it is an OGC exception report.
pub fn parse_gml(xml: &str) -> GeoServerResult<FeatureCollection> {
    let root = XmlNode::parse(xml, DOCUMENT)?;

    if let Some(message) = root.exception_report() {
        return Err(GeoServerError::ServiceException { message });
    }

    let members = match root.name.as_str() {
        "wfs:FeatureCollection" => root.elements("gml:featureMember"),
        "FeatureCollection" => root.elements("featureMember"),
        other => {
            return Err(GeoServerError::XmlStructure {
                document: DOCUMENT,
                message: format!("expected a FeatureCollection root, found <{}>", other),
            })
        }
    };

    let mut features = Vec::new();
    let mut dropped = 0usize;

    for member in members {
        for node in member.children.iter().filter(|c| !is_gml(&c.name)) {
            match convert_feature(node) {
                Some(feature) => features.push(feature),
                None => dropped += 1,
            }
        }
    }

    info!(
        features = features.len(),
        dropped = dropped,
        "Parsed features from GML"
    );

    Ok(FeatureCollection::new().with_features(features))
}

fn convert_feature(node: &XmlNode) -> Option<Feature> {
    let Some((kind, geometry_node)) = find_geometry(node) else {
        debug!(feature_type = %node.name, "Dropping GML feature without geometry");
        return None;
    };

    let geometry = match extract_geometry(kind, geometry_node) {
        Extraction::Geometry(geometry) => geometry,
        Extraction::Unsupported(kind) => {
            debug!(
                feature_type = %node.name,
                kind = ?kind,
                "Dropping GML feature with unsupported geometry"
            );
            return None;
        }
        Extraction::Invalid(reason) => {
            warn!(
                feature_type = %node.name,
                reason = %reason,
                "Dropping GML feature with unreadable geometry"
            );
            return None;
        }
    };

    let mut feature = Feature::new(Some(geometry), flat_properties(node));
    if let Some(fid) = node.attr("fid").or_else(|| node.attr("gml:id")) {
        feature = feature.with_id(fid);
    }
    Some(feature)
}

/// First geometry element directly under the feature, or inside one of its
/// property elements (`<ws:the_geom><gml:Point>`).
fn find_geometry(node: &XmlNode) -> Option<(GmlGeometryKind, &XmlNode)> {
    direct_geometry(node).or_else(|| {
        node.children
            .iter()
            .filter(|c| !is_gml(&c.name))
            .find_map(direct_geometry)
    })
}

fn direct_geometry(node: &XmlNode) -> Option<(GmlGeometryKind, &XmlNode)> {
    node.children
        .iter()
        .find_map(|c| GmlGeometryKind::from_element(&c.name).map(|kind| (kind, c)))
}

fn extract_geometry(kind: GmlGeometryKind, node: &XmlNode) -> Extraction {
    match kind {
        GmlGeometryKind::Point => read_point(node),
        other => Extraction::Unsupported(other),
    }
}

fn read_point(node: &XmlNode) -> Extraction {
    let Some(coordinates) = node.first("gml:coordinates") else {
        return Extraction::Invalid("gml:Point without gml:coordinates".to_string());
    };
    let separator = coordinates.attr("cs").unwrap_or(",");

    let values: Result<Vec<f64>, _> = coordinates
        .text
        .split(separator)
        .take(2)
        .map(|v| v.trim().parse::<f64>())
        .collect();

    match values {
        Ok(values) if values.len() == 2 => {
            Extraction::Geometry(Geometry::point(values[0], values[1]))
        }
        _ => Extraction::Invalid(format!("unreadable coordinates '{}'", coordinates.text)),
    }
}

/// Text-only, non-`gml:` children that occur once. Keys drop the namespace
/// prefix so they match GeoServer's GeoJSON output.
fn flat_properties(node: &XmlNode) -> Properties {
    let mut properties = Properties::new();
    for child in &node.children {
        if is_gml(&child.name) || !child.is_text_leaf() {
            continue;
        }
        if node.elements(&child.name).len() > 1 {
            continue;
        }
        properties.insert(
            child.local_name().to_string(),
            Value::String(child.text.clone()),
        );
    }
    properties
}

fn is_gml(name: &str) -> bool {
    name.starts_with("gml:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(members: &str) -> String {
        format!(
            r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:ws="urn:ws">{}</wfs:FeatureCollection>"#,
            members
        )
    }

    #[test]
    fn test_point_extracted() {
        let xml = collection(
            r#"<gml:featureMember><ws:poi><gml:Point><gml:coordinates>10,20</gml:coordinates></gml:Point><ws:name>Well</ws:name></ws:poi></gml:featureMember>"#,
        );
        let fc = parse_gml(&xml).unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].geometry, Some(Geometry::point(10.0, 20.0)));
        assert_eq!(fc.features[0].properties["name"], "Well");
    }

    #[test]
    fn test_custom_coordinate_separator() {
        let xml = collection(
            r#"<gml:featureMember><ws:poi><gml:Point><gml:coordinates cs=" ">1.5 2.5</gml:coordinates></gml:Point></ws:poi></gml:featureMember>"#,
        );
        let fc = parse_gml(&xml).unwrap();
        assert_eq!(fc.features[0].geometry, Some(Geometry::point(1.5, 2.5)));
    }

    #[test]
    fn test_unreadable_coordinates_drop_feature() {
        let xml = collection(
            r#"<gml:featureMember><ws:poi><gml:Point><gml:coordinates>abc</gml:coordinates></gml:Point></ws:poi></gml:featureMember>"#,
        );
        assert!(parse_gml(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_geometry_kinds() {
        assert_eq!(GmlGeometryKind::from_element("gml:Point"), Some(GmlGeometryKind::Point));
        assert_eq!(GmlGeometryKind::from_element("Point"), None);
        assert_eq!(GmlGeometryKind::from_element("gml:coordinates"), None);
    }

    #[test]
    fn test_repeated_and_attributed_elements_are_not_properties() {
        let xml = collection(
            r#"<gml:featureMember><ws:poi><gml:Point><gml:coordinates>0,0</gml:coordinates></gml:Point><ws:tag>a</ws:tag><ws:tag>b</ws:tag><ws:unit uom="m">5</ws:unit><ws:kind>spring</ws:kind></ws:poi></gml:featureMember>"#,
        );
        let fc = parse_gml(&xml).unwrap();
        let properties = &fc.features[0].properties;
        assert_eq!(properties.len(), 1);
        assert_eq!(properties["kind"], "spring");
    }
}
