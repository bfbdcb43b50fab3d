//! Per-id serialization on a shared map.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::Mutex;

use map_runtime::{add_geojson, property_map, GeoJsonLayerConfig, MapHandle, SharedMap};
use ogc_common::{Feature, FeatureCollection};
use test_utils::RecordingMap;

fn config(color: &str) -> GeoJsonLayerConfig {
    let mut config = GeoJsonLayerConfig::new(
        "parcels",
        FeatureCollection::new().with_features(vec![Feature::point(0.0, 0.0)]),
    );
    config.paint = Some(property_map(json!({ "fill-color": color })));
    config
}

#[tokio::test]
async fn test_same_id_work_is_serialized() {
    let shared = SharedMap::new(RecordingMap::new());
    let log = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let shared = shared.clone();
        let log = Arc::clone(&log);
        tokio::spawn(async move {
            let _guard = shared.lock_id("parcels").await;
            log.lock().await.push("first:start");
            // Simulated fetch while holding the id.
            tokio::time::sleep(Duration::from_millis(50)).await;
            add_geojson(&mut *shared.map().await, &config("#111")).unwrap();
            log.lock().await.push("first:end");
        })
    };

    // Let the first task take the id lock.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = {
        let shared = shared.clone();
        let log = Arc::clone(&log);
        tokio::spawn(async move {
            let _guard = shared.lock_id("parcels").await;
            log.lock().await.push("second:start");
            add_geojson(&mut *shared.map().await, &config("#222")).unwrap();
            log.lock().await.push("second:end");
        })
    };

    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(
        *log.lock().await,
        vec!["first:start", "first:end", "second:start", "second:end"]
    );
    let map = shared.map().await;
    assert_eq!(map.count("add_source"), 1);
    assert_eq!(map.count("add_layer"), 1);
    assert_eq!(map.paint("parcels", "fill-color"), Some(&json!("#222")));
}

#[tokio::test]
async fn test_different_ids_do_not_block_each_other() {
    let shared = SharedMap::new(RecordingMap::new());
    let _held = shared.lock_id("a").await;

    let other = tokio::time::timeout(Duration::from_millis(100), shared.lock_id("b")).await;
    assert!(other.is_ok());
}

#[tokio::test]
async fn test_reconcile_runs_under_id_lock() {
    let shared = SharedMap::new(RecordingMap::new());
    let outcome = shared
        .reconcile("parcels", |map| add_geojson(map, &config("#333")))
        .await
        .unwrap();

    assert_eq!(outcome, map_runtime::Reconciled::Added);
    assert!(shared.map().await.has_layer("parcels"));
}

#[tokio::test]
async fn test_released_ids_are_pruned() {
    let shared = SharedMap::new(RecordingMap::new());
    for id in ["a", "b", "c"] {
        let _guard = shared.lock_id(id).await;
    }
    // Taking one more lock prunes every released entry.
    let _guard = shared.lock_id("d").await;
    assert_eq!(shared.tracked_ids(), 1);
}
