//! Timeline events as authored in scenario data
//!
//! Every event is a JSON object whose `event` field selects the variant.
//! Payload field names follow the authored camelCase layout.

use serde::{Deserialize, Serialize};

use crate::types::choice::{Choice, MultiChoice};

/// One instruction in a timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum Event {
    /// Show a line of dialog with a typing reveal
    #[serde(rename = "dialog")]
    SetDialog(DialogLine),
    /// Clear the actor label and dialog text
    #[serde(rename = "clear_dialog")]
    ClearDialog,
    /// Replace the background with a single image
    #[serde(rename = "set_background")]
    SetBackground(BackgroundImage),
    /// Remove all background content
    #[serde(rename = "clear_background")]
    ClearBackground,
    /// Replace the screen frame overlay
    #[serde(rename = "set_frame")]
    SetFrame(FrameImage),
    /// Layer one more foreground image on top of the existing ones
    #[serde(rename = "add_foreground")]
    AddForeground(ForegroundImage),
    /// Remove all foreground content
    #[serde(rename = "clear_foreground")]
    ClearForeground,
    /// Ask the host to restart with another timeline
    #[serde(rename = "timeline_transition")]
    TimelineTransition(TimelineJump),
    /// Ask the host to navigate to another scene
    #[serde(rename = "scene_transition")]
    SceneTransition(SceneJump),
    /// Single-select branch
    #[serde(rename = "choice")]
    Choice(ChoiceSet),
    /// Multi-select graded branch
    #[serde(rename = "multi_choice")]
    MultiChoice(MultiChoiceSet),
    /// Show an external link widget
    #[serde(rename = "show_weblink")]
    ShowWebLink(WebLink),
    /// Remove the external link widget
    #[serde(rename = "hide_weblink")]
    HideWebLink,
    /// Start a sound unless it is already playing
    #[serde(rename = "play_sound")]
    PlaySound(SoundCue),
    /// Stop a sound if it is playing
    #[serde(rename = "clear_sound")]
    ClearSound(SoundKey),
    /// Any discriminant this build does not know about
    #[serde(rename = "unknown", other)]
    Unknown,
}

/// How the interpreter proceeds after dispatching an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Apply and immediately run the next event
    Immediate,
    /// Halt until a pointer down, a gate resolution or the host takes over
    Blocking,
}

impl Event {
    /// Authored discriminant of this event
    pub fn tag(&self) -> &'static str {
        match self {
            Event::SetDialog(_) => "dialog",
            Event::ClearDialog => "clear_dialog",
            Event::SetBackground(_) => "set_background",
            Event::ClearBackground => "clear_background",
            Event::SetFrame(_) => "set_frame",
            Event::AddForeground(_) => "add_foreground",
            Event::ClearForeground => "clear_foreground",
            Event::TimelineTransition(_) => "timeline_transition",
            Event::SceneTransition(_) => "scene_transition",
            Event::Choice(_) => "choice",
            Event::MultiChoice(_) => "multi_choice",
            Event::ShowWebLink(_) => "show_weblink",
            Event::HideWebLink => "hide_weblink",
            Event::PlaySound(_) => "play_sound",
            Event::ClearSound(_) => "clear_sound",
            Event::Unknown => "unknown",
        }
    }

    pub fn pacing(&self) -> Pacing {
        match self {
            Event::ClearDialog
            | Event::SetBackground(_)
            | Event::ClearBackground
            | Event::SetFrame(_)
            | Event::AddForeground(_)
            | Event::ClearForeground
            | Event::PlaySound(_)
            | Event::ClearSound(_)
            | Event::HideWebLink => Pacing::Immediate,
            Event::SetDialog(_)
            | Event::TimelineTransition(_)
            | Event::SceneTransition(_)
            | Event::Choice(_)
            | Event::MultiChoice(_)
            | Event::ShowWebLink(_)
            | Event::Unknown => Pacing::Blocking,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.pacing() == Pacing::Blocking
    }
}

/// Payload of a dialog event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DialogLine {
    pub text: String,
    #[serde(default, alias = "actor_name", skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_fill_alpha: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_fill_alpha: Option<f32>,
}

impl DialogLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn spoken_by(mut self, actor: impl Into<String>) -> Self {
        self.actor_name = Some(actor.into());
        self
    }
}

/// Background image placement with an optional entrance effect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackgroundImage {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// `fadein`, `fadeout`, or anything else for no animation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

/// Frame overlay image. The frame is always centered, `x`/`y` are accepted
/// for schema compatibility only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameImage {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForegroundImage {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineJump {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneJump {
    pub key: String,
    /// Opaque payload handed to the destination scene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceSet {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiChoiceSet {
    pub choices: Vec<MultiChoice>,
    pub correct_key: String,
    pub incorrect_key: String,
    #[serde(default)]
    pub min_select: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_select: Option<usize>,
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl WebLink {
    pub const DEFAULT_TARGET: &'static str = "_blank";

    /// Link text, falling back to the url
    pub fn label(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.url)
    }

    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(Self::DEFAULT_TARGET)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoundCue {
    pub key: String,
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoundKey {
    pub key: String,
}
