//! Reconciliation behaviour against an in-memory map.

use serde_json::json;

use map_runtime::{
    add_geojson, add_vector_tile_layer, add_wms_layer, ensure_layer, ensure_source, fit_bounds,
    fly_to, property_map, remove_layer, set_layer_order, set_layer_visibility, FitBoundsOptions,
    GeoJsonLayerConfig, LayerSpec, LayerType, MapHandle, Reconciled, SourceSpec,
    VectorTileLayerConfig, ViewportConfig, WmsLayerConfig,
};
use ogc_common::{BoundingBox, Feature, FeatureCollection};
use test_utils::{MapCall, RecordingMap};

fn collection() -> FeatureCollection {
    FeatureCollection::new().with_features(vec![Feature::point(10.0, 20.0)])
}

fn fill_layer(paint: serde_json::Value) -> LayerSpec {
    LayerSpec::new("parcels", LayerType::Fill, "parcels-source").with_paint(property_map(paint))
}

#[test]
fn test_twice_reconciled_geojson_adds_once_and_updates_once() {
    let mut map = RecordingMap::new();
    let source = SourceSpec::geojson(collection());
    let layer = fill_layer(json!({"fill-color": "#088"}));

    for _ in 0..2 {
        ensure_source(&mut map, "parcels-source", &source).unwrap();
        ensure_layer(&mut map, &layer, None).unwrap();
    }

    assert_eq!(map.count("add_source"), 1);
    assert_eq!(map.count("add_layer"), 1);
    assert_eq!(map.count("set_geojson_data"), 1);
}

#[test]
fn test_ensure_outcomes() {
    let mut map = RecordingMap::new();
    let source = SourceSpec::geojson(collection());
    assert_eq!(
        ensure_source(&mut map, "parcels-source", &source).unwrap(),
        Reconciled::Added
    );
    assert_eq!(
        ensure_source(&mut map, "parcels-source", &source).unwrap(),
        Reconciled::Updated
    );

    let bare = LayerSpec::new("parcels", LayerType::Fill, "parcels-source");
    assert_eq!(ensure_layer(&mut map, &bare, None).unwrap(), Reconciled::Added);
    assert_eq!(ensure_layer(&mut map, &bare, None).unwrap(), Reconciled::Unchanged);
}

#[test]
fn test_existing_tile_sources_are_not_touched() {
    let mut map = RecordingMap::new();
    let first = SourceSpec::Vector {
        tiles: vec!["http://a/{z}/{x}/{y}.pbf".to_string()],
        promote_id: None,
    };
    let second = SourceSpec::Vector {
        tiles: vec!["http://b/{z}/{x}/{y}.pbf".to_string()],
        promote_id: None,
    };
    ensure_source(&mut map, "v-source", &first).unwrap();
    let outcome = ensure_source(&mut map, "v-source", &second).unwrap();

    assert_eq!(outcome, Reconciled::Unchanged);
    assert_eq!(map.source("v-source"), Some(&first));
    assert_eq!(map.calls().len(), 1);
}

#[test]
fn test_layer_patch_keeps_omitted_properties() {
    let mut map = RecordingMap::new();
    ensure_source(&mut map, "parcels-source", &SourceSpec::geojson(collection())).unwrap();
    ensure_layer(
        &mut map,
        &fill_layer(json!({"fill-color": "#f00", "fill-opacity": 0.8})),
        None,
    )
    .unwrap();

    ensure_layer(&mut map, &fill_layer(json!({"fill-opacity": 0.5})), None).unwrap();

    assert_eq!(map.paint("parcels", "fill-color"), Some(&json!("#f00")));
    assert_eq!(map.paint("parcels", "fill-opacity"), Some(&json!(0.5)));
    assert_eq!(map.count("set_paint_property"), 1);
}

#[test]
fn test_layer_added_before_existing_layer() {
    let mut map = RecordingMap::new();
    ensure_source(&mut map, "parcels-source", &SourceSpec::geojson(collection())).unwrap();
    ensure_layer(&mut map, &fill_layer(json!({})), None).unwrap();

    let labels = LayerSpec::new("labels", LayerType::Symbol, "parcels-source");
    ensure_layer(&mut map, &labels, Some("parcels")).unwrap();

    assert_eq!(map.layer_order(), vec!["labels", "parcels"]);
}

#[test]
fn test_visibility_on_missing_layer_is_a_no_op() {
    let mut map = RecordingMap::new();
    set_layer_visibility(&mut map, "nonexistent", true);
    assert_eq!(map.count("set_layout_property"), 0);
    assert!(map.calls().is_empty());
}

#[test]
fn test_visibility_toggles_layout() {
    let mut map = RecordingMap::new();
    ensure_source(&mut map, "parcels-source", &SourceSpec::geojson(collection())).unwrap();
    ensure_layer(&mut map, &fill_layer(json!({})), None).unwrap();

    set_layer_visibility(&mut map, "parcels", false);
    assert_eq!(map.layout("parcels", "visibility"), Some(&json!("none")));
    set_layer_visibility(&mut map, "parcels", true);
    assert_eq!(map.layout("parcels", "visibility"), Some(&json!("visible")));
}

#[test]
fn test_map_failure_during_visibility_is_swallowed() {
    let mut map = RecordingMap::new();
    ensure_source(&mut map, "parcels-source", &SourceSpec::geojson(collection())).unwrap();
    ensure_layer(&mut map, &fill_layer(json!({})), None).unwrap();
    map.fail_on("set_layout_property");

    set_layer_visibility(&mut map, "parcels", false);
    assert_eq!(map.layout("parcels", "visibility"), None);
}

#[test]
fn test_layer_order() {
    let mut map = RecordingMap::new();
    for id in ["a", "b", "c"] {
        add_wms_layer(&mut map, &WmsLayerConfig::new(id, "http://gs/wms?x")).unwrap();
    }

    set_layer_order(&mut map, "c", Some("a"));
    assert_eq!(map.layer_order(), vec!["c", "a", "b"]);

    set_layer_order(&mut map, "c", None);
    assert_eq!(map.layer_order(), vec!["a", "b", "c"]);

    set_layer_order(&mut map, "missing", None);
    assert_eq!(map.count("move_layer"), 2);
}

#[test]
fn test_remove_layer_removes_layer_then_source() {
    let mut map = RecordingMap::new();
    add_geojson(&mut map, &GeoJsonLayerConfig::new("parcels", collection())).unwrap();

    remove_layer(&mut map, "parcels").unwrap();

    assert!(!map.has_layer("parcels"));
    assert!(!map.has_source("parcels-source"));
    let operations: Vec<_> = map.calls().iter().map(MapCall::operation).collect();
    assert_eq!(
        &operations[operations.len() - 2..],
        &["remove_layer", "remove_source"]
    );
}

#[test]
fn test_remove_layer_is_guarded_independently() {
    let mut map = RecordingMap::new();
    remove_layer(&mut map, "ghost").unwrap();
    assert!(map.calls().is_empty());

    // Source left behind without its layer is still cleaned up.
    map.add_source("orphan-source", &SourceSpec::geojson(collection()))
        .unwrap();
    remove_layer(&mut map, "orphan").unwrap();
    assert!(!map.has_source("orphan-source"));
    assert_eq!(map.count("remove_layer"), 0);
}

#[test]
fn test_add_geojson_defaults() {
    let mut map = RecordingMap::new();
    let outcome = add_geojson(&mut map, &GeoJsonLayerConfig::new("parcels", collection())).unwrap();

    assert_eq!(outcome, Reconciled::Added);
    let layer = map.layer("parcels").unwrap();
    assert_eq!(layer.source, "parcels-source");
    assert_eq!(layer.layer_type, LayerType::Fill);
    assert_eq!(map.paint("parcels", "fill-color"), Some(&json!("#088")));
    assert_eq!(map.paint("parcels", "fill-opacity"), Some(&json!(0.8)));
}

#[test]
fn test_add_geojson_twice_updates_data() {
    let mut map = RecordingMap::new();
    add_geojson(&mut map, &GeoJsonLayerConfig::new("parcels", collection())).unwrap();

    let bigger = collection().with_features(vec![Feature::point(1.0, 1.0)]);
    let outcome = add_geojson(&mut map, &GeoJsonLayerConfig::new("parcels", bigger.clone())).unwrap();

    assert_eq!(outcome, Reconciled::Updated);
    assert_eq!(map.count("add_source"), 1);
    assert_eq!(
        map.source("parcels-source"),
        Some(&SourceSpec::geojson(bigger))
    );
}

#[test]
fn test_add_vector_tile_layer() {
    let mut map = RecordingMap::new();
    let mut config = VectorTileLayerConfig::new(
        "roads",
        vec!["http://gs/gwc/service/tms/1.0.0/ws:roads@EPSG:900913@pbf/{z}/{x}/{-y}.pbf".to_string()],
        "roads",
    );
    config.promote_id = Some("osm_id".to_string());

    add_vector_tile_layer(&mut map, &config).unwrap();

    match map.source("roads-source") {
        Some(SourceSpec::Vector { promote_id, .. }) => {
            assert_eq!(promote_id.as_deref(), Some("osm_id"))
        }
        other => panic!("unexpected source {:?}", other),
    }
    assert_eq!(
        map.layer("roads").unwrap().source_layer.as_deref(),
        Some("roads")
    );
}

#[test]
fn test_add_wms_layer_registers_raster_pair() {
    let mut map = RecordingMap::new();
    let url = "http://gs/wms?layers=ws%3Aroads&bbox={bbox-epsg-3857}";
    add_wms_layer(&mut map, &WmsLayerConfig::new("roads", url)).unwrap();

    assert_eq!(
        map.source("roads-source"),
        Some(&SourceSpec::Raster {
            tiles: vec![url.to_string()],
            tile_size: 256
        })
    );
    assert_eq!(map.layer("roads").unwrap().layer_type, LayerType::Raster);
    assert_eq!(map.paint("roads", "raster-opacity"), Some(&json!(1)));
}

#[test]
fn test_map_errors_propagate_from_ensure() {
    let mut map = RecordingMap::new();
    map.fail_on("add_source");
    let result = add_geojson(&mut map, &GeoJsonLayerConfig::new("parcels", collection()));
    assert!(result.is_err());
    assert!(!map.has_layer("parcels"));
}

#[test]
fn test_fly_to_and_fit_bounds_defaults() {
    let mut map = RecordingMap::new();
    fly_to(&mut map, &ViewportConfig::new(19.94, 50.06, 12.0));
    fit_bounds(&mut map, &BoundingBox::new(19.8, 49.9, 20.2, 50.2), None);
    fit_bounds(
        &mut map,
        &BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        Some(FitBoundsOptions {
            padding: 40.0,
            ..Default::default()
        }),
    );

    match &map.calls()[0] {
        MapCall::FlyTo(options) => {
            assert_eq!(options.duration, 1000);
            assert!(options.essential);
        }
        other => panic!("unexpected call {:?}", other),
    }
    assert_eq!(
        map.calls()[1],
        MapCall::FitBounds(
            BoundingBox::new(19.8, 49.9, 20.2, 50.2),
            FitBoundsOptions::default()
        )
    );
    match &map.calls()[2] {
        MapCall::FitBounds(_, options) => {
            assert_eq!(options.padding, 40.0);
            assert_eq!(options.max_zoom, 16.0);
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn test_animation_failures_do_not_panic() {
    let mut map = RecordingMap::new();
    map.fail_on("fly_to");
    map.fail_on("fit_bounds");
    fly_to(&mut map, &ViewportConfig::new(0.0, 0.0, 1.0));
    fit_bounds(&mut map, &BoundingBox::new(0.0, 0.0, 1.0, 1.0), None);
    assert!(map.calls().is_empty());
}
