//! Core types for the emaki library
//!
//! This module contains the authored data model:
//! - Event: one tagged instruction in a timeline
//! - Choice / MultiChoice: options carried by branching events
//! - Timeline: an ordered list of events
//! - TimelineRegistry: named timelines plus asset preload dictionaries

pub mod choice;
pub mod event;
pub mod timeline;

pub use choice::{Choice, MultiChoice};
pub use event::{
    BackgroundImage, ChoiceSet, DialogLine, Event, ForegroundImage, FrameImage, MultiChoiceSet,
    Pacing, SceneJump, SoundCue, SoundKey, TimelineJump, WebLink,
};
pub use timeline::{PreloadFileDict, Timeline, TimelineRegistry};
