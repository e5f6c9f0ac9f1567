//! Lint configuration

use serde::{Deserialize, Serialize};

/// Lint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Reference checks configuration
    pub references: ReferencesConfig,
    /// Quality checks configuration
    pub quality: QualityConfig,
    /// Flow analysis configuration
    pub flow: FlowConfig,
}

/// Reference checking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    /// Enable reference checks
    pub enabled: bool,
    /// Check that transition and choice keys name registered timelines
    pub check_timelines: bool,
    /// Check image and audio keys against the preload dictionaries
    pub check_assets: bool,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_timelines: true,
            check_assets: true,
        }
    }
}

/// Quality checking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Enable quality checks
    pub enabled: bool,
    /// Maximum dialog length (characters)
    pub max_text_length: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_text_length: 200,
        }
    }
}

/// Flow analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Enable flow analysis
    pub enabled: bool,
    /// Timeline playback starts from
    pub entry: String,
    /// Report timelines that no path from `entry` reaches
    pub check_orphans: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            entry: "start".to_string(),
            check_orphans: true,
        }
    }
}
