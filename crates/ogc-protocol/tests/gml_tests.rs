//! GML2 conversion against GeoServer-shaped GetFeature responses.

use serde_json::json;

use ogc_common::{ErrorKind, GeoServerError, Geometry};
use ogc_protocol::parse_gml;
use test_utils::{assert_coords_approx_eq, fixtures};

fn point(geometry: &Option<Geometry>) -> (f64, f64) {
    match geometry {
        Some(Geometry::Point { coordinates }) => (coordinates[0], coordinates[1]),
        other => panic!("expected a point, got {:?}", other),
    }
}

#[test]
fn test_single_point_feature() {
    let collection = parse_gml(fixtures::gml::SINGLE_POINT).unwrap();
    assert_eq!(collection.type_, "FeatureCollection");
    assert_eq!(collection.len(), 1);

    let feature = &collection.features[0];
    assert_eq!(feature.id, Some(json!("poi.1")));
    let (x, y) = point(&feature.geometry);
    assert_coords_approx_eq!((x, y), (10.0, 20.0), 1e-9);
    assert_eq!(feature.properties["NAME"], "museam");
    assert_eq!(feature.properties["THUMBNAIL"], "pics/22037827-Ti.jpg");
    // Geometry containers are not properties.
    assert!(!feature.properties.contains_key("the_geom"));
}

#[test]
fn test_every_member_and_nested_feature_converted() {
    let collection = parse_gml(fixtures::gml::MANY_POINTS).unwrap();
    let ids: Vec<_> = collection
        .features
        .iter()
        .filter_map(|f| f.id.as_ref().and_then(|id| id.as_str()))
        .collect();
    assert_eq!(ids, ["poi.1", "poi.2", "poi.3", "poi.4"]);

    let (x, y) = point(&collection.features[1].geometry);
    assert_coords_approx_eq!((x, y), (-74.008387, 40.711152), 1e-9);
    assert!(collection.features[2].properties.is_empty());
}

#[test]
fn test_linestring_feature_dropped_without_error() {
    let collection = parse_gml(fixtures::gml::LINESTRING_ONLY).unwrap();
    assert!(collection.is_empty());
}

#[test]
fn test_mixed_geometries_keep_only_points() {
    let collection = parse_gml(fixtures::gml::MIXED_GEOMETRIES).unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.features[0].properties["label"], "kept");
}

#[test]
fn test_unprefixed_dialect() {
    let collection = parse_gml(fixtures::gml::UNPREFIXED).unwrap();
    assert_eq!(collection.len(), 1);
    let (x, y) = point(&collection.features[0].geometry);
    assert_coords_approx_eq!((x, y), (5.0, 6.0), 1e-9);
    assert_eq!(collection.features[0].properties["name"], "plain");
}

#[test]
fn test_empty_collection() {
    let collection = parse_gml(fixtures::gml::EMPTY).unwrap();
    assert!(collection.is_empty());
    assert_eq!(
        serde_json::to_value(&collection).unwrap(),
        json!({"type": "FeatureCollection", "features": []})
    );
}

#[test]
fn test_malformed_xml_is_parse_error() {
    let err = parse_gml(fixtures::gml::MALFORMED).unwrap_err();
    assert!(matches!(err, GeoServerError::XmlParse { .. }));
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_exception_reports_surface_message() {
    let err = parse_gml(fixtures::exceptions::SERVICE_EXCEPTION).unwrap_err();
    match err {
        GeoServerError::ServiceException { message } => {
            assert_eq!(message, "Feature type ws:missing unknown")
        }
        other => panic!("unexpected error {:?}", other),
    }

    let err = parse_gml(fixtures::exceptions::OWS_EXCEPTION).unwrap_err();
    assert!(err
        .to_string()
        .contains("Could not find output format application/json"));
}

#[test]
fn test_foreign_root_is_structure_error() {
    let err = parse_gml(fixtures::capabilities::WMS_130_CRS).unwrap_err();
    assert!(matches!(err, GeoServerError::XmlStructure { .. }));
}
