//! Lint module for timeline registry checking
//!
//! This module provides static checks over a [`TimelineRegistry`]:
//! - Reference integrity (timeline keys, preloaded assets)
//! - Choice gate sanity (empty option lists, selection bounds)
//! - Flow analysis (unreachable events and timelines)

use crate::types::TimelineRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod checks;
pub mod config;

/// Lint severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LintLevel {
    /// Error: playback will misbehave
    Error,
    /// Warning: should be reviewed
    Warning,
    /// Info: for your information
    Info,
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LintLevel::Error => "error",
            LintLevel::Warning => "warning",
            LintLevel::Info => "info",
        };
        f.write_str(label)
    }
}

/// A lint issue found in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintIssue {
    /// Severity level
    pub level: LintLevel,
    /// Issue message
    pub message: String,
    /// Timeline the issue belongs to
    pub timeline: String,
    /// Event index inside the timeline, if the issue is about one event
    pub index: Option<usize>,
    /// Category of the issue
    pub category: String,
}

impl LintIssue {
    pub fn at(
        level: LintLevel,
        category: &str,
        timeline: &str,
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            timeline: timeline.to_string(),
            index: Some(index),
            category: category.to_string(),
        }
    }

    pub fn timeline(
        level: LintLevel,
        category: &str,
        timeline: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            timeline: timeline.to_string(),
            index: None,
            category: category.to_string(),
        }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(
                f,
                "{}[{}] {}#{}: {}",
                self.level, self.category, self.timeline, index, self.message
            ),
            None => write!(
                f,
                "{}[{}] {}: {}",
                self.level, self.category, self.timeline, self.message
            ),
        }
    }
}

/// Result of linting a registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintResult {
    /// Issues found
    pub issues: Vec<LintIssue>,
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Number of info messages
    pub info_count: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            error_count: 0,
            warning_count: 0,
            info_count: 0,
        }
    }

    pub fn add_issue(&mut self, issue: LintIssue) {
        match issue.level {
            LintLevel::Error => self.error_count += 1,
            LintLevel::Warning => self.warning_count += 1,
            LintLevel::Info => self.info_count += 1,
        }
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl Default for LintResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Lint a registry with default configuration
pub fn lint(registry: &TimelineRegistry) -> LintResult {
    let config = config::LintConfig::default();
    lint_with_config(registry, &config)
}

/// Lint a registry with custom configuration
pub fn lint_with_config(registry: &TimelineRegistry, config: &config::LintConfig) -> LintResult {
    let mut result = LintResult::new();

    if config.references.enabled {
        checks::references::check(registry, &mut result, config);
    }

    if config.quality.enabled {
        checks::quality::check(registry, &mut result, config);
    }

    if config.flow.enabled {
        checks::flow::check(registry, &mut result, config);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Choice, ChoiceSet, DialogLine, Event, Timeline, TimelineJump};

    #[test]
    fn lint_empty_registry() {
        let result = lint(&TimelineRegistry::new());

        assert!(result.is_clean());
        assert_eq!(result.error_count, 0);
        assert_eq!(result.warning_count, 0);
    }

    #[test]
    fn lint_simple_valid_registry() {
        let mut registry = TimelineRegistry::new();
        registry.insert(
            "start",
            Timeline::new(vec![
                Event::SetDialog(DialogLine::new("Hello, world!").spoken_by("Alice")),
                Event::Choice(ChoiceSet {
                    choices: vec![Choice::new("Go on", "end")],
                }),
            ]),
        );
        registry.insert(
            "end",
            Timeline::new(vec![
                Event::SetDialog(DialogLine::new("Goodbye!")),
                Event::TimelineTransition(TimelineJump {
                    key: "start".to_string(),
                }),
            ]),
        );

        let result = lint(&registry);

        assert!(result.is_clean(), "{:?}", result.issues);
    }

    #[test]
    fn issue_display_names_location() {
        let issue = LintIssue::at(LintLevel::Error, "references", "start", 3, "boom");
        assert_eq!(issue.to_string(), "error[references] start#3: boom");

        let issue = LintIssue::timeline(LintLevel::Info, "flow", "orphan", "unused");
        assert_eq!(issue.to_string(), "info[flow] orphan: unused");
    }
}
