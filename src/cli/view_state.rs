//! View state management for the terminal player
//!
//! This module folds recorded surface commands into what the terminal has
//! already shown and calculates rendering deltas, so only changes are printed.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::recording::SurfaceCommand;
use crate::surface::{Fade, Layer};

/// Represents what the terminal currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Timeline being played
    pub timeline: Option<String>,
    pub background: Option<String>,
    pub frame: Option<String>,
    /// Foreground images, back to front
    pub foreground: Vec<String>,
    /// Sounds started and not yet stopped
    pub sounds: BTreeSet<String>,
    pub actor: Option<String>,
    pub dialog: String,
    pub web_link: Option<String>,
}

impl ViewState {
    /// Create a new empty ViewState
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget what a scene restart removes; playing sounds carry over
    pub fn reset_scene(&mut self) {
        *self = Self {
            sounds: std::mem::take(&mut self.sounds),
            ..Self::new()
        };
    }

    /// Apply a batch of surface commands and return the rendering delta
    pub fn apply_commands(
        &mut self,
        commands: &[SurfaceCommand],
        timeline: Option<&str>,
    ) -> RenderDelta {
        let mut delta = RenderDelta::new();

        if timeline.is_some() && timeline != self.timeline.as_deref() {
            delta.timeline_changed = true;
            delta.new_timeline = timeline.map(str::to_string);
            self.timeline = timeline.map(str::to_string);
        }

        for command in commands {
            match command {
                SurfaceCommand::SetBackground { key, fade, .. } => {
                    if self.background.as_deref() != Some(key.as_str()) {
                        delta.effects_added.push(show_image(key, Layer::Background, fade));
                        self.background = Some(key.clone());
                    }
                }
                SurfaceCommand::ClearBackground => {
                    if self.background.take().is_some() {
                        delta.effects_added.push(clear_layer(Layer::Background));
                    }
                }
                SurfaceCommand::SetFrame { key, .. } => {
                    if self.frame.as_deref() != Some(key.as_str()) {
                        delta
                            .effects_added
                            .push(show_image(key, Layer::Frame, &Fade::None));
                        self.frame = Some(key.clone());
                    }
                }
                SurfaceCommand::AddForeground { key, .. } => {
                    // Foreground stacks, so repeats are new images
                    delta
                        .effects_added
                        .push(show_image(key, Layer::Foreground, &Fade::None));
                    self.foreground.push(key.clone());
                }
                SurfaceCommand::ClearForeground => {
                    if !self.foreground.is_empty() {
                        self.foreground.clear();
                        delta.effects_added.push(clear_layer(Layer::Foreground));
                    }
                }
                SurfaceCommand::SetActorName { name } => {
                    delta.speaker = Some(name.clone());
                    self.actor = Some(name.clone());
                }
                SurfaceCommand::ClearActorName => {
                    self.actor = None;
                    delta.speaker = None;
                }
                SurfaceCommand::SetDialogText { text } => {
                    self.dialog = text.clone();
                    delta.dialog = (!text.is_empty()).then(|| text.clone());
                }
                SurfaceCommand::ClearDialogText => {
                    self.dialog.clear();
                    delta.dialog = None;
                }
                SurfaceCommand::PlaySound { key, looping } => {
                    let kind = if *looping { "PlayLoop" } else { "PlaySound" };
                    delta.effects_added.push(format!("{}: {}", kind, key));
                    self.sounds.insert(key.clone());
                }
                SurfaceCommand::StopSound { key } => {
                    if self.sounds.remove(key) {
                        delta.effects_added.push(format!("StopSound: {}", key));
                    }
                }
                SurfaceCommand::ShowWebLink { link } => {
                    delta
                        .effects_added
                        .push(format!("WebLink: {} <{}>", link.text, link.url));
                    self.web_link = Some(link.url.clone());
                }
                SurfaceCommand::HideWebLink => {
                    if self.web_link.take().is_some() {
                        delta.effects_added.push("HideWebLink".to_string());
                    }
                }
                // Buttons and the hit area are drawn from the surface itself
                SurfaceCommand::AddButton { .. }
                | SurfaceCommand::SetButtonState { .. }
                | SurfaceCommand::ClearButtons
                | SurfaceCommand::SetAdvanceEnabled { .. } => {}
            }
        }

        delta
    }
}

fn show_image(key: &str, layer: Layer, fade: &Fade) -> String {
    let direction = if fade.target_alpha() > fade.initial_alpha() {
        "in"
    } else {
        "out"
    };
    match fade {
        Fade::None => format!("ShowImage: {} ({})", key, layer),
        Fade::In(_) | Fade::Out(_) => format!(
            "ShowImage: {} ({}, fade {} {}ms)",
            key,
            layer,
            direction,
            fade.duration().as_millis()
        ),
    }
}

fn clear_layer(layer: Layer) -> String {
    format!("ClearLayer: {}", layer)
}

/// Represents what needs to be rendered (the delta from previous state)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderDelta {
    /// Whether a different timeline started
    pub timeline_changed: bool,
    /// New timeline key (if changed)
    pub new_timeline: Option<String>,
    /// Effects that were added (human-readable strings)
    pub effects_added: Vec<String>,
    /// Actor label that appeared
    pub speaker: Option<String>,
    /// Dialog text left on screen at the end of the batch
    pub dialog: Option<String>,
}

impl RenderDelta {
    /// Create a new empty RenderDelta
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this delta has any changes
    pub fn is_empty(&self) -> bool {
        !self.timeline_changed
            && self.effects_added.is_empty()
            && self.speaker.is_none()
            && self.dialog.is_none()
    }
}

/// Render a delta to the terminal
pub fn render_delta<W: Write>(out: &mut W, delta: &RenderDelta) -> io::Result<()> {
    if delta.timeline_changed
        && let Some(timeline) = &delta.new_timeline
    {
        writeln!(out, "=== Timeline: {} ===", timeline)?;
        writeln!(out)?;
    }

    if !delta.effects_added.is_empty() {
        writeln!(out, "[Effects]")?;
        for effect in &delta.effects_added {
            writeln!(out, "  {}", effect)?;
        }
        writeln!(out)?;
    }

    if let Some(speaker) = &delta.speaker {
        writeln!(out, "{}:", speaker)?;
    }

    if let Some(text) = &delta.dialog {
        writeln!(out, "{}", text)?;
        writeln!(out)?;
    }

    Ok(())
}
