//! Headless presentation surface
//!
//! [`RecordingSurface`] keeps the visible state a real renderer would hold and
//! logs every command it receives. The terminal player renders from it, and
//! `emaki dump` serialises its command log.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::surface::{
    ButtonId, ButtonSpec, ButtonState, CanvasSize, Fade, Layer, Position, PresentationSurface,
    TextStyle, WebLinkView,
};

/// One call received by the surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceCommand {
    SetBackground { key: String, at: Position, fade: Fade },
    ClearBackground,
    SetFrame { key: String, at: Position },
    AddForeground { key: String, at: Position },
    ClearForeground,
    SetActorName { name: String },
    ClearActorName,
    SetDialogText { text: String },
    ClearDialogText,
    AddButton { button: ButtonSpec },
    SetButtonState { id: ButtonId, state: ButtonState },
    ClearButtons,
    PlaySound { key: String, looping: bool },
    StopSound { key: String },
    ShowWebLink { link: WebLinkView },
    HideWebLink,
    SetAdvanceEnabled { enabled: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub key: String,
    pub at: Position,
    pub fade: Fade,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    canvas: CanvasSize,
    commands: Vec<SurfaceCommand>,
    pub background: Option<PlacedImage>,
    pub foreground: Vec<PlacedImage>,
    pub frame: Option<PlacedImage>,
    pub actor_name: Option<String>,
    pub dialog_text: String,
    pub buttons: Vec<(ButtonSpec, ButtonState)>,
    /// Playing sounds and whether they loop
    pub sounds: BTreeMap<String, bool>,
    pub web_link: Option<WebLinkView>,
    pub advance_enabled: bool,
}

impl RecordingSurface {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            commands: Vec::new(),
            background: None,
            foreground: Vec::new(),
            frame: None,
            actor_name: None,
            dialog_text: String::new(),
            buttons: Vec::new(),
            sounds: BTreeMap::new(),
            web_link: None,
            advance_enabled: true,
        }
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Drain the command log, keeping the visible state
    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drop every renderable, as a scene restart would
    ///
    /// Audio outlives the scene, so playing sounds are kept.
    pub fn reset_scene(&mut self) {
        let sounds = std::mem::take(&mut self.sounds);
        *self = Self {
            sounds,
            ..Self::new(self.canvas)
        };
    }

    /// Visible images, back to front
    pub fn images(&self) -> Vec<(Layer, &PlacedImage)> {
        let mut images: Vec<(Layer, &PlacedImage)> = self
            .background
            .iter()
            .map(|image| (Layer::Background, image))
            .chain(self.frame.iter().map(|image| (Layer::Frame, image)))
            .chain(self.foreground.iter().map(|image| (Layer::Foreground, image)))
            .collect();
        // Stable, so the foreground keeps its insertion order
        images.sort_by_key(|(layer, _)| *layer);
        images
    }

    pub fn button_state(&self, id: ButtonId) -> Option<ButtonState> {
        self.buttons
            .iter()
            .find(|(spec, _)| spec.id == id)
            .map(|(_, state)| *state)
    }

    fn record(&mut self, command: SurfaceCommand) {
        self.commands.push(command);
    }
}

impl PresentationSurface for RecordingSurface {
    fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    fn set_background(&mut self, key: &str, at: Position, fade: Fade) {
        self.background = Some(PlacedImage {
            key: key.to_string(),
            at,
            fade,
        });
        self.record(SurfaceCommand::SetBackground {
            key: key.to_string(),
            at,
            fade,
        });
    }

    fn clear_background(&mut self) {
        self.background = None;
        self.record(SurfaceCommand::ClearBackground);
    }

    fn set_frame(&mut self, key: &str, at: Position) {
        self.frame = Some(PlacedImage {
            key: key.to_string(),
            at,
            fade: Fade::None,
        });
        self.record(SurfaceCommand::SetFrame {
            key: key.to_string(),
            at,
        });
    }

    fn add_foreground(&mut self, key: &str, at: Position) {
        self.foreground.push(PlacedImage {
            key: key.to_string(),
            at,
            fade: Fade::None,
        });
        self.record(SurfaceCommand::AddForeground {
            key: key.to_string(),
            at,
        });
    }

    fn clear_foreground(&mut self) {
        self.foreground.clear();
        self.record(SurfaceCommand::ClearForeground);
    }

    fn set_actor_name(&mut self, name: &str, _style: &TextStyle) {
        self.actor_name = Some(name.to_string());
        self.record(SurfaceCommand::SetActorName {
            name: name.to_string(),
        });
    }

    fn clear_actor_name(&mut self) {
        self.actor_name = None;
        self.record(SurfaceCommand::ClearActorName);
    }

    fn set_dialog_text(&mut self, text: &str, _style: &TextStyle) {
        self.dialog_text = text.to_string();
        self.record(SurfaceCommand::SetDialogText {
            text: text.to_string(),
        });
    }

    fn clear_dialog_text(&mut self) {
        self.dialog_text.clear();
        self.record(SurfaceCommand::ClearDialogText);
    }

    fn add_button(&mut self, button: &ButtonSpec) {
        self.buttons.push((button.clone(), ButtonState::Idle));
        self.record(SurfaceCommand::AddButton {
            button: button.clone(),
        });
    }

    fn set_button_state(&mut self, id: ButtonId, state: ButtonState) {
        if let Some((_, current)) = self.buttons.iter_mut().find(|(spec, _)| spec.id == id) {
            *current = state;
        }
        self.record(SurfaceCommand::SetButtonState { id, state });
    }

    fn clear_buttons(&mut self) {
        self.buttons.clear();
        self.record(SurfaceCommand::ClearButtons);
    }

    fn is_sound_playing(&self, key: &str) -> bool {
        self.sounds.contains_key(key)
    }

    fn play_sound(&mut self, key: &str, looping: bool) {
        self.sounds.insert(key.to_string(), looping);
        self.record(SurfaceCommand::PlaySound {
            key: key.to_string(),
            looping,
        });
    }

    fn stop_sound(&mut self, key: &str) {
        self.sounds.remove(key);
        self.record(SurfaceCommand::StopSound {
            key: key.to_string(),
        });
    }

    fn show_web_link(&mut self, link: &WebLinkView) {
        self.web_link = Some(link.clone());
        self.record(SurfaceCommand::ShowWebLink { link: link.clone() });
    }

    fn hide_web_link(&mut self) {
        self.web_link = None;
        self.record(SurfaceCommand::HideWebLink);
    }

    fn set_advance_enabled(&mut self, enabled: bool) {
        self.advance_enabled = enabled;
        self.record(SurfaceCommand::SetAdvanceEnabled { enabled });
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(CanvasSize::new(960.0, 800.0))
    }
}
