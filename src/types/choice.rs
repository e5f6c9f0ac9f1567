//! Options carried by choice events

use serde::{Deserialize, Serialize};

/// A single-select option: display text and the timeline it leads to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub text: String,
    pub key: String,
}

impl Choice {
    pub fn new(text: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            key: key.into(),
        }
    }
}

/// A multi-select option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiChoice {
    pub text: String,
    /// Part of the correct answer set
    pub correct: bool,
    /// Marks an option that must never be picked
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub contraindication: bool,
    /// Score weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
}

impl MultiChoice {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
            contraindication: false,
            point: None,
        }
    }
}
