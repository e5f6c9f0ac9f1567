//! Debug logging for timeline playback
//!
//! Messages go through the `log` facade under the `emaki::<category>` target,
//! filtered first by [`DebugConfig`] so noisy categories can stay silent even
//! when a logger is installed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Debug log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Every dispatched event and reveal tick
    Trace,
    /// Development debugging information
    Debug,
    /// Transitions and gate resolutions
    Info,
    /// Content problems the interpreter works around
    Warn,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
        }
    }
}

/// Debug log category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebugCategory {
    /// Cursor movement and dispatch
    Engine,
    /// Auto-advance, blocking and transitions
    Flow,
    /// Choice gates
    Choice,
    /// Sound cues
    Audio,
    /// Background, foreground and frame changes
    Layers,
}

impl DebugCategory {
    pub fn target(self) -> &'static str {
        match self {
            DebugCategory::Engine => "emaki::engine",
            DebugCategory::Flow => "emaki::flow",
            DebugCategory::Choice => "emaki::choice",
            DebugCategory::Audio => "emaki::audio",
            DebugCategory::Layers => "emaki::layers",
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Enable debug logging
    pub enabled: bool,
    /// Enabled categories
    pub categories: HashSet<DebugCategory>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let mut categories = HashSet::new();
        categories.insert(DebugCategory::Engine);
        categories.insert(DebugCategory::Flow);
        categories.insert(DebugCategory::Choice);

        Self {
            enabled: std::env::var("EMAKI_DEBUG").is_ok(),
            categories,
        }
    }
}

impl DebugConfig {
    /// Everything on, regardless of the environment
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            categories: [
                DebugCategory::Engine,
                DebugCategory::Flow,
                DebugCategory::Choice,
                DebugCategory::Audio,
                DebugCategory::Layers,
            ]
            .into_iter()
            .collect(),
        }
    }

    pub fn allows(&self, category: DebugCategory) -> bool {
        self.enabled && self.categories.contains(&category)
    }
}

/// Log a debug message
pub fn log(config: &DebugConfig, category: DebugCategory, level: LogLevel, message: &str) {
    if !config.allows(category) {
        return;
    }
    log::log!(target: category.target(), level.into(), "{message}");
}
