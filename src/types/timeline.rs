//! Timelines and the registry that names them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PlayerError;
use crate::types::event::Event;

/// Ordered, append-only list of events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Timeline {
    events: Vec<Event>,
}

impl Timeline {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }
}

impl From<Vec<Event>> for Timeline {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<Event> for Timeline {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Asset key to path mapping supplied for preloading
pub type PreloadFileDict = BTreeMap<String, String>;

/// Named timelines plus the asset dictionaries the host preloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimelineRegistry {
    pub timelines: BTreeMap<String, Timeline>,
    #[serde(default)]
    pub images: PreloadFileDict,
    #[serde(default)]
    pub audio: PreloadFileDict,
}

impl TimelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, timeline: Timeline) {
        self.timelines.insert(key.into(), timeline);
    }

    pub fn get(&self, key: &str) -> Result<&Timeline, PlayerError> {
        self.timelines
            .get(key)
            .ok_or_else(|| PlayerError::unknown_timeline(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.timelines.contains_key(key)
    }

    /// Timeline keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.timelines.keys().map(String::as_str)
    }

    pub fn from_json(json: &str) -> Result<Self, PlayerError> {
        Ok(serde_json::from_str(json)?)
    }
}
