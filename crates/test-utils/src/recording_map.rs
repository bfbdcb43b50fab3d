//! In-memory [`MapHandle`] that keeps style state and a call log.
//!
//! It enforces the same preconditions a Mapbox GL map does (no duplicate
//! ids, layers need their source, a source in use cannot be removed), so
//! runtime bugs show up as errors rather than silently passing.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use map_runtime::{
    FitBoundsOptions, FlyToOptions, GeoJsonData, LayerSpec, MapError, MapHandle, MapResult,
    SourceSpec,
};
use ogc_common::BoundingBox;

/// One recorded call on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    AddSource { id: String, kind: &'static str },
    SetGeoJsonData { id: String },
    RemoveSource { id: String },
    AddLayer { id: String, before_id: Option<String> },
    RemoveLayer { id: String },
    SetLayoutProperty { layer_id: String, name: String, value: Value },
    SetPaintProperty { layer_id: String, name: String, value: Value },
    MoveLayer { id: String, before_id: Option<String> },
    FlyTo(FlyToOptions),
    FitBounds(BoundingBox, FitBoundsOptions),
}

impl MapCall {
    /// Name of the map method this call corresponds to.
    pub fn operation(&self) -> &'static str {
        match self {
            MapCall::AddSource { .. } => "add_source",
            MapCall::SetGeoJsonData { .. } => "set_geojson_data",
            MapCall::RemoveSource { .. } => "remove_source",
            MapCall::AddLayer { .. } => "add_layer",
            MapCall::RemoveLayer { .. } => "remove_layer",
            MapCall::SetLayoutProperty { .. } => "set_layout_property",
            MapCall::SetPaintProperty { .. } => "set_paint_property",
            MapCall::MoveLayer { .. } => "move_layer",
            MapCall::FlyTo(_) => "fly_to",
            MapCall::FitBounds(..) => "fit_bounds",
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingMap {
    sources: HashMap<String, SourceSpec>,
    /// Bottom to top paint order.
    layers: Vec<LayerSpec>,
    calls: Vec<MapCall>,
    failing: HashSet<&'static str>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to `operation` fail with [`MapError::Rejected`].
    pub fn fail_on(&mut self, operation: &'static str) {
        self.failing.insert(operation);
    }

    pub fn calls(&self) -> &[MapCall] {
        &self.calls
    }

    /// Number of recorded calls to `operation`.
    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    /// Live layer state, with every patch applied.
    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn paint(&self, layer_id: &str, name: &str) -> Option<&Value> {
        self.layer(layer_id).and_then(|l| l.paint.get(name))
    }

    pub fn layout(&self, layer_id: &str, name: &str) -> Option<&Value> {
        self.layer(layer_id).and_then(|l| l.layout.get(name))
    }

    /// Layer ids from bottom to top.
    pub fn layer_order(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    fn check(&self, operation: &'static str) -> MapResult<()> {
        if self.failing.contains(operation) {
            return Err(MapError::Rejected {
                operation,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn layer_index(&self, id: &str) -> MapResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| MapError::LayerNotFound(id.to_string()))
    }

    /// Index a layer inserted below `before_id` would take; the top when
    /// `before_id` is absent or unknown.
    fn insertion_index(&self, before_id: Option<&str>) -> usize {
        before_id
            .and_then(|b| self.layers.iter().position(|l| l.id == b))
            .unwrap_or(self.layers.len())
    }
}

impl MapHandle for RecordingMap {
    fn has_source(&self, source_id: &str) -> bool {
        self.sources.contains_key(source_id)
    }

    fn add_source(&mut self, source_id: &str, source: &SourceSpec) -> MapResult<()> {
        self.check("add_source")?;
        self.calls.push(MapCall::AddSource {
            id: source_id.to_string(),
            kind: source.kind(),
        });
        if self.sources.contains_key(source_id) {
            return Err(MapError::DuplicateSource(source_id.to_string()));
        }
        self.sources.insert(source_id.to_string(), source.clone());
        Ok(())
    }

    fn set_geojson_data(&mut self, source_id: &str, data: &GeoJsonData) -> MapResult<()> {
        self.check("set_geojson_data")?;
        self.calls.push(MapCall::SetGeoJsonData {
            id: source_id.to_string(),
        });
        match self.sources.get_mut(source_id) {
            Some(SourceSpec::Geojson { data: current }) => {
                *current = data.clone();
                Ok(())
            }
            Some(other) => Err(MapError::Rejected {
                operation: "set_geojson_data",
                message: format!("source {} is {}", source_id, other.kind()),
            }),
            None => Err(MapError::SourceNotFound(source_id.to_string())),
        }
    }

    fn remove_source(&mut self, source_id: &str) -> MapResult<()> {
        self.check("remove_source")?;
        self.calls.push(MapCall::RemoveSource {
            id: source_id.to_string(),
        });
        if let Some(layer) = self.layers.iter().find(|l| l.source == source_id) {
            return Err(MapError::Rejected {
                operation: "remove_source",
                message: format!("source {} is used by layer {}", source_id, layer.id),
            });
        }
        self.sources
            .remove(source_id)
            .map(|_| ())
            .ok_or_else(|| MapError::SourceNotFound(source_id.to_string()))
    }

    fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.iter().any(|l| l.id == layer_id)
    }

    fn add_layer(&mut self, layer: &LayerSpec, before_id: Option<&str>) -> MapResult<()> {
        self.check("add_layer")?;
        self.calls.push(MapCall::AddLayer {
            id: layer.id.clone(),
            before_id: before_id.map(str::to_string),
        });
        if self.has_layer(&layer.id) {
            return Err(MapError::DuplicateLayer(layer.id.clone()));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(MapError::SourceNotFound(layer.source.clone()));
        }
        let index = self.insertion_index(before_id);
        self.layers.insert(index, layer.clone());
        Ok(())
    }

    fn remove_layer(&mut self, layer_id: &str) -> MapResult<()> {
        self.check("remove_layer")?;
        self.calls.push(MapCall::RemoveLayer {
            id: layer_id.to_string(),
        });
        let index = self.layer_index(layer_id)?;
        self.layers.remove(index);
        Ok(())
    }

    fn set_layout_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: &Value,
    ) -> MapResult<()> {
        self.check("set_layout_property")?;
        self.calls.push(MapCall::SetLayoutProperty {
            layer_id: layer_id.to_string(),
            name: name.to_string(),
            value: value.clone(),
        });
        let index = self.layer_index(layer_id)?;
        self.layers[index]
            .layout
            .insert(name.to_string(), value.clone());
        Ok(())
    }

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: &Value) -> MapResult<()> {
        self.check("set_paint_property")?;
        self.calls.push(MapCall::SetPaintProperty {
            layer_id: layer_id.to_string(),
            name: name.to_string(),
            value: value.clone(),
        });
        let index = self.layer_index(layer_id)?;
        self.layers[index]
            .paint
            .insert(name.to_string(), value.clone());
        Ok(())
    }

    fn move_layer(&mut self, layer_id: &str, before_id: Option<&str>) -> MapResult<()> {
        self.check("move_layer")?;
        self.calls.push(MapCall::MoveLayer {
            id: layer_id.to_string(),
            before_id: before_id.map(str::to_string),
        });
        let index = self.layer_index(layer_id)?;
        let layer = self.layers.remove(index);
        let target = self.insertion_index(before_id);
        self.layers.insert(target, layer);
        Ok(())
    }

    fn fly_to(&mut self, options: &FlyToOptions) -> MapResult<()> {
        self.check("fly_to")?;
        self.calls.push(MapCall::FlyTo(*options));
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &BoundingBox, options: &FitBoundsOptions) -> MapResult<()> {
        self.check("fit_bounds")?;
        self.calls.push(MapCall::FitBounds(*bounds, *options));
        Ok(())
    }
}
