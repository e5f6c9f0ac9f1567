//! Errors raised while loading or looking up timelines
//!
//! The interpreter itself never fails on content; these cover the edges
//! around it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Unknown timeline '{key}'")]
    UnknownTimeline { key: String },

    #[error("Invalid timeline data: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlayerError {
    pub fn unknown_timeline(key: impl Into<String>) -> Self {
        Self::UnknownTimeline { key: key.into() }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse {
            message: format!("line {}, column {}: {}", error.line(), error.column(), error),
            source: Some(error),
        }
    }
}
