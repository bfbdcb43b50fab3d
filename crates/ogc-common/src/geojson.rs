//! GeoJSON types exchanged between the WFS client and the map runtime.
//!
//! Members this crate does not model (`totalFeatures`, `crs`,
//! `geometry_name` and friends emitted by GeoServer) are kept in
//! `foreign_members` so a collection passes through unchanged.
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc7946>

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::BoundingBox;

/// A GeoJSON position: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// Flat feature property map.
pub type Properties = Map<String, Value>;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    #[serde(default)]
    pub features: Vec<Feature>,

    /// Unmodelled top-level members.
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
            foreign_members: Map::new(),
        }
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Extent of every geometry position in the collection.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut points = Vec::new();
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            geometry.collect_xy(&mut points);
        }
        BoundingBox::from_points(points)
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Optional feature identifier (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// The geometry of this feature. `null` is valid GeoJSON.
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Flat property map; a `null` member deserializes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,

    /// Unmodelled members.
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Properties) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry,
            properties,
            foreign_members: Map::new(),
        }
    }

    /// Create a feature with a point geometry and no properties.
    pub fn point(x: f64, y: f64) -> Self {
        Self::new(Some(Geometry::point(x, y)), Properties::new())
    }

    /// Set the feature ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Value::String(id.into()));
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

/// GeoJSON geometry objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point {
            coordinates: vec![x, y],
        }
    }

    fn collect_xy(&self, out: &mut Vec<(f64, f64)>) {
        let mut push = |p: &Position| {
            if let [x, y, ..] = p.as_slice() {
                out.push((*x, *y));
            }
        };
        match self {
            Geometry::Point { coordinates } => push(coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().for_each(push)
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().flatten().for_each(push)
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(push)
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_xy(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geoserver_collection_keeps_foreign_members() {
        let json = r#"{
            "type": "FeatureCollection",
            "totalFeatures": 1,
            "features": [{
                "type": "Feature",
                "id": "roads.1",
                "geometry": {"type": "LineString", "coordinates": [[0.5, 0.5], [1.5, 1.5]]},
                "geometry_name": "the_geom",
                "properties": {"name": "Main St"}
            }]
        }"#;
        let fc: FeatureCollection = serde_json::from_str(json).unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.foreign_members["totalFeatures"], 1);
        assert_eq!(fc.features[0].foreign_members["geometry_name"], "the_geom");

        let back: Value = serde_json::to_value(&fc).unwrap();
        let original: Value = serde_json::from_str(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_null_properties_and_geometry() {
        let json = r#"{"type": "Feature", "geometry": null, "properties": null}"#;
        let feature: Feature = serde_json::from_str(json).unwrap();
        assert!(feature.geometry.is_none());
        assert!(feature.properties.is_empty());
    }

    #[test]
    fn test_bounds_cover_all_geometries() {
        let fc = FeatureCollection::new().with_features(vec![
            Feature::point(10.0, 20.0),
            Feature::new(
                Some(Geometry::LineString {
                    coordinates: vec![vec![-1.0, 5.0], vec![3.0, 25.0]],
                }),
                Properties::new(),
            ),
        ]);
        let bounds = fc.bounds().unwrap();
        assert_eq!(bounds.to_array(), [-1.0, 5.0, 10.0, 25.0]);
    }
}
