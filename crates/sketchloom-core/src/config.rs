//! Editor configuration.

use crate::shapes::SerializableColor;
use crate::snap::GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Durable-store key holding the JSON array of scene snapshots.
pub const HISTORY_KEY: &str = "canvasHistory";
/// Durable-store key holding the history cursor.
pub const HISTORY_INDEX_KEY: &str = "historyIndex";
/// Durable-store key holding the canvas background colour.
pub const BG_COLOR_KEY: &str = "canvasBgColor";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for an editing session.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Grid pitch used by snapping and the helper grid.
    pub grid_size: f64,
    /// Trailing debounce applied to structural history pushes, in milliseconds.
    pub history_debounce_ms: u64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    pub duplicate_offset: f64,
    pub paste_offset: f64,
    pub export_multiplier: f64,
    pub background: SerializableColor,
    pub default_fill: SerializableColor,
    pub default_stroke: SerializableColor,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000.0,
            canvas_height: 700.0,
            grid_size: GRID_SIZE,
            history_debounce_ms: 150,
            nudge_step: 2.0,
            nudge_step_large: 10.0,
            duplicate_offset: 20.0,
            paste_offset: 30.0,
            export_multiplier: 2.0,
            background: SerializableColor::new(0x07, 0x5B, 0x5E, 255),
            default_fill: SerializableColor::new(0xF2, 0xE2, 0xB1, 255),
            default_stroke: SerializableColor::new(0x2D, 0x90, 0xF2, 255),
            min_zoom: 0.1,
            max_zoom: 2.0,
            zoom_step: 0.1,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Load a config file, falling back to defaults when it is missing or
    /// invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }

    pub fn canvas_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.canvas_width, self.canvas_height)
    }
}
