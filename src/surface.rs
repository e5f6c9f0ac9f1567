//! Presentation surface contract
//!
//! The interpreter never draws, plays or hit-tests anything itself. It issues
//! commands through [`PresentationSurface`], and the surface owns every
//! renderable object. Layers stack in the order of [`Layer`]:
//! background < foreground < frame < dialog < selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Resolve optional authored coordinates, defaulting each axis to center
    pub fn place(&self, x: Option<f32>, y: Option<f32>) -> Position {
        let center = self.center();
        Position::new(x.unwrap_or(center.x), y.unwrap_or(center.y))
    }
}

/// Back-to-front stacking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Foreground,
    Frame,
    Dialog,
    Selection,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Background => "background",
            Layer::Foreground => "foreground",
            Layer::Frame => "frame",
            Layer::Dialog => "dialog",
            Layer::Selection => "selection",
        };
        f.write_str(name)
    }
}

/// Alpha animation applied to a freshly placed background
///
/// The surface runs it detached; the interpreter does not wait for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fade {
    None,
    In(Duration),
    Out(Duration),
}

impl Fade {
    /// Map an authored effect name; unknown names mean no animation
    pub fn from_effect(effect: Option<&str>, duration: Duration) -> Self {
        match effect {
            Some("fadein") => Fade::In(duration),
            Some("fadeout") => Fade::Out(duration),
            _ => Fade::None,
        }
    }

    pub fn initial_alpha(&self) -> f32 {
        match self {
            Fade::In(_) => 0.0,
            Fade::None | Fade::Out(_) => 1.0,
        }
    }

    pub fn target_alpha(&self) -> f32 {
        match self {
            Fade::Out(_) => 0.0,
            Fade::None | Fade::In(_) => 1.0,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Fade::None => Duration::ZERO,
            Fade::In(d) | Fade::Out(d) => *d,
        }
    }
}

/// Fill colour and alpha for dialog text or the actor label
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub fill_color: Option<String>,
    pub fill_alpha: Option<f32>,
}

impl TextStyle {
    pub fn new(fill_color: Option<String>, fill_alpha: Option<f32>) -> Self {
        Self {
            fill_color,
            fill_alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ButtonId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonRole {
    /// Single-select option, pressing it resolves the gate
    Choice,
    /// Multi-select option, pressing it toggles it
    Toggle,
    /// Multi-select confirmation
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    Idle,
    Selected,
}

/// Rectangular button on the selection layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub id: ButtonId,
    pub role: ButtonRole,
    pub label: String,
    pub center: Position,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebLinkView {
    pub url: String,
    pub text: String,
    pub target: String,
}

/// Capabilities the interpreter needs from the rendering, audio and input
/// substrate. Asset keys are passed through unchecked.
pub trait PresentationSurface {
    fn canvas(&self) -> CanvasSize;

    /// Replace all background content with one image
    fn set_background(&mut self, key: &str, at: Position, fade: Fade);
    fn clear_background(&mut self);

    /// Replace the frame overlay
    fn set_frame(&mut self, key: &str, at: Position);

    /// Add one image on top of the existing foreground
    fn add_foreground(&mut self, key: &str, at: Position);
    fn clear_foreground(&mut self);

    fn set_actor_name(&mut self, name: &str, style: &TextStyle);
    fn clear_actor_name(&mut self);

    /// Show `text` in the dialog box, replacing what was there
    fn set_dialog_text(&mut self, text: &str, style: &TextStyle);
    fn clear_dialog_text(&mut self);

    fn add_button(&mut self, button: &ButtonSpec);
    fn set_button_state(&mut self, id: ButtonId, state: ButtonState);
    fn clear_buttons(&mut self);

    fn is_sound_playing(&self, key: &str) -> bool;
    fn play_sound(&mut self, key: &str, looping: bool);
    /// Stop and release a sound
    fn stop_sound(&mut self, key: &str);

    fn show_web_link(&mut self, link: &WebLinkView);
    fn hide_web_link(&mut self);

    /// Arm or disarm the full-surface pointer-down area
    fn set_advance_enabled(&mut self, enabled: bool);
}
