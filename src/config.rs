//! Player configuration
//!
//! Canvas size, timing and gate layout. Every field has a default so a
//! partial JSON document is enough to override a single value.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::PlayerError;
use crate::runtime::debug::DebugConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Delay between two revealed characters
    pub typing_interval_ms: u64,
    /// Duration of `fadein`/`fadeout` background effects
    pub fade_duration_ms: u64,
    pub layout: GateLayout,
    /// Fixes the multi-choice shuffle when set
    pub seed: Option<u64>,
    #[serde(skip)]
    pub debug: DebugConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 960.0,
            canvas_height: 800.0,
            typing_interval_ms: 50,
            fade_duration_ms: 1000,
            layout: GateLayout::default(),
            seed: None,
            debug: DebugConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, PlayerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PlayerError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Geometry of the choice gates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateLayout {
    pub choice_button_height: f32,
    pub choice_button_margin: f32,
    pub multi_button_height: f32,
    pub multi_button_margin: f32,
    /// Space kept free for the dialog box below the multi-choice buttons
    pub dialog_reserve: f32,
    pub confirm_width: f32,
    pub confirm_height: f32,
    pub confirm_label: String,
}

impl Default for GateLayout {
    fn default() -> Self {
        Self {
            choice_button_height: 40.0,
            choice_button_margin: 40.0,
            multi_button_height: 80.0,
            multi_button_margin: 10.0,
            dialog_reserve: 180.0,
            confirm_width: 240.0,
            confirm_height: 40.0,
            confirm_label: "Confirm".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PlayerConfig::from_json(r#"{ "typing_interval_ms": 20, "seed": 7 }"#).unwrap();
        assert_eq!(config.typing_interval(), Duration::from_millis(20));
        assert_eq!(config.fade_duration(), Duration::from_millis(1000));
        assert_eq!(config.canvas_width, 960.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.layout, GateLayout::default());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            PlayerConfig::from_json("{ nope"),
            Err(PlayerError::Parse { .. })
        ));
    }
}
