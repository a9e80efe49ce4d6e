use serde::{Deserialize, Serialize};

/// Font used for per-layer notations and legend labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    pub family: String,
    pub size: f64,
    /// Extra horizontal shift applied to notation text.
    pub offset_x: f64,
    /// Extra upward shift applied to notation text.
    pub offset_y: f64,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "arial".to_string(),
            size: 30.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Construction parameters of a [`crate::Model`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    /// Gap between consecutive slices of one layer.
    pub slice_gap: f64,
    #[serde(default)]
    pub font: FontSettings,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            slice_gap: 10.0,
            font: FontSettings::default(),
        }
    }
}

impl CanvasSettings {
    pub fn new(width: u32, height: u32, slice_gap: f64) -> Self {
        Self {
            width,
            height,
            slice_gap,
            ..Default::default()
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
