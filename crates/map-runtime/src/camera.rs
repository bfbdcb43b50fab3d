//! Viewport animation parameters.

use serde::{Deserialize, Serialize};

/// Desired viewport for [`fly_to`](crate::fly_to).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub lng: f64,
    pub lat: f64,
    pub zoom: f64,
    #[serde(default)]
    pub pitch: Option<f64>,
    #[serde(default)]
    pub bearing: Option<f64>,
    /// Animation length; 1000 ms when unset.
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl ViewportConfig {
    pub fn new(lng: f64, lat: f64, zoom: f64) -> Self {
        Self {
            lng,
            lat,
            zoom,
            pitch: None,
            bearing: None,
            duration_ms: None,
        }
    }
}

/// The `flyTo` call as issued to the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlyToOptions {
    pub center: [f64; 2],
    pub zoom: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    pub duration: u64,
    /// Animate even when the user prefers reduced motion.
    pub essential: bool,
}

impl From<&ViewportConfig> for FlyToOptions {
    fn from(config: &ViewportConfig) -> Self {
        Self {
            center: [config.lng, config.lat],
            zoom: config.zoom,
            pitch: config.pitch,
            bearing: config.bearing,
            duration: config.duration_ms.unwrap_or(1000),
            essential: true,
        }
    }
}

/// Options for [`fit_bounds`](crate::fit_bounds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitBoundsOptions {
    /// Pixels kept free around the bounds.
    pub padding: f64,
    pub max_zoom: f64,
    /// Milliseconds.
    pub duration: u64,
}

impl Default for FitBoundsOptions {
    fn default() -> Self {
        Self {
            padding: 20.0,
            max_zoom: 16.0,
            duration: 1000,
        }
    }
}
