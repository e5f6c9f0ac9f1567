//! Timeline interpreter
//!
//! [`TimelinePlayer`] owns the cursor over one timeline. It runs immediate
//! events back to back and stops at blocking ones until the host forwards a
//! pointer down ([`TimelinePlayer::advance`]), a button press
//! ([`TimelinePlayer::press`]) or clock time ([`TimelinePlayer::tick`]).
//!
//! One player serves one timeline activation. When it reports
//! [`Progress::Navigate`] the host tears it down and builds a fresh one.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::surface::{ButtonId, ButtonSpec, Fade, PresentationSurface, TextStyle, WebLinkView};
use crate::types::{Event, Pacing, Timeline, TimelineRegistry};

pub mod debug;
pub mod gate;
pub mod typing;

#[cfg(test)]
mod tests;

use debug::{DebugCategory, LogLevel};
use gate::{Gate, GateResponse, MultiChoiceGate, SingleChoiceGate};
use typing::TypingReveal;

/// Signal from the interpreter to its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Navigation {
    /// Restart the current presentation context with another timeline
    Restart { timeline: String },
    /// Move to another scene, passing an opaque payload
    Scene {
        scene: String,
        data: Option<serde_json::Value>,
    },
}

/// What the interpreter is waiting for after a call
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A dialog line is still being revealed
    Typing,
    /// Waiting for a pointer down
    WaitInput,
    /// A choice gate is open; pointer downs are ignored
    WaitChoice,
    /// Stopped on an event kind this build does not understand
    Stalled,
    /// The cursor ran off the end of the timeline
    Ended,
    /// The host must take over; this player is done
    Navigate(Navigation),
    /// A navigation was already reported, nothing more will happen
    Finished,
}

impl Progress {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Progress::Ended | Progress::Navigate(_) | Progress::Finished)
    }
}

/// Position of a player inside a named timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub timeline_key: Option<String>,
    pub index: usize,
}

pub struct TimelinePlayer<'a, S: PresentationSurface + ?Sized> {
    surface: &'a mut S,
    config: PlayerConfig,
    timeline: Option<&'a Timeline>,
    timeline_key: Option<String>,
    index: usize,
    typing: Option<TypingReveal>,
    dialog_style: TextStyle,
    gate: Option<Gate>,
    advance_enabled: bool,
    navigation: Option<Navigation>,
    progress: Progress,
    rng: StdRng,
}

impl<'a, S: PresentationSurface + ?Sized> TimelinePlayer<'a, S> {
    pub fn new(surface: &'a mut S, config: PlayerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            surface,
            config,
            timeline: None,
            timeline_key: None,
            index: 0,
            typing: None,
            dialog_style: TextStyle::default(),
            gate: None,
            advance_enabled: true,
            navigation: None,
            progress: Progress::Ended,
            rng,
        }
    }

    /// Begin playback at the first event
    pub fn start(&mut self, timeline: &'a Timeline) -> Progress {
        self.start_at(timeline, 0)
    }

    /// Begin playback at `index`, e.g. from a [`CursorSnapshot`]
    pub fn start_at(&mut self, timeline: &'a Timeline, index: usize) -> Progress {
        self.timeline = Some(timeline);
        self.index = index;
        self.typing = None;
        self.gate = None;
        self.navigation = None;
        self.set_advance_enabled(true);
        self.log(
            DebugCategory::Engine,
            LogLevel::Info,
            &format!(
                "[Start] timeline={} index={} events={}",
                self.timeline_key.as_deref().unwrap_or("<anonymous>"),
                index,
                timeline.len()
            ),
        );
        let progress = self.run();
        self.settle(progress)
    }

    /// Look up `key` in the registry and start it
    pub fn start_key(
        &mut self,
        registry: &'a TimelineRegistry,
        key: &str,
    ) -> Result<Progress, PlayerError> {
        let timeline = registry.get(key)?;
        self.timeline_key = Some(key.to_string());
        Ok(self.start(timeline))
    }

    /// Resume a snapshot taken from an earlier player
    pub fn resume(
        &mut self,
        registry: &'a TimelineRegistry,
        snapshot: &CursorSnapshot,
    ) -> Result<Progress, PlayerError> {
        let key = snapshot
            .timeline_key
            .as_deref()
            .ok_or_else(|| PlayerError::parse("snapshot has no timeline key"))?;
        let timeline = registry.get(key)?;
        self.timeline_key = Some(key.to_string());
        Ok(self.start_at(timeline, snapshot.index))
    }

    /// Pointer down on the full-surface hit area
    ///
    /// A line still being typed is completed instead of moving on, so two
    /// calls are needed to get past a dialog line.
    pub fn advance(&mut self) -> Progress {
        if self.navigation.is_some() {
            return Progress::Finished;
        }
        if !self.advance_enabled {
            self.log(
                DebugCategory::Flow,
                LogLevel::Trace,
                "[Advance] hit area disabled, ignoring",
            );
            return self.progress.clone();
        }
        if let Some(reveal) = self.typing.take() {
            let text = reveal.finish();
            self.surface.set_dialog_text(&text, &self.dialog_style);
            self.log(
                DebugCategory::Flow,
                LogLevel::Debug,
                "[Advance] typing cancelled, full line shown",
            );
            return self.settle(Progress::WaitInput);
        }
        let progress = self.run();
        self.settle(progress)
    }

    /// Press a gate button
    pub fn press(&mut self, id: ButtonId) -> Progress {
        if self.navigation.is_some() {
            return Progress::Finished;
        }
        let Some(gate) = self.gate.as_mut() else {
            return self.progress.clone();
        };
        let response = gate.press(id, &mut *self.surface);
        let progress = match response {
            other @ (GateResponse::Ignored
            | GateResponse::Rejected
            | GateResponse::BelowMinimum) => {
                self.log(
                    DebugCategory::Choice,
                    LogLevel::Debug,
                    &format!("[Gate] press {:?} -> {:?}", id, other),
                );
                return self.progress.clone();
            }
            GateResponse::Toggled { index, state } => {
                self.log(
                    DebugCategory::Choice,
                    LogLevel::Debug,
                    &format!("[Gate] option {} -> {:?}", index, state),
                );
                return self.progress.clone();
            }
            GateResponse::Resolved {
                destination,
                verdict,
            } => {
                if let Some(verdict) = verdict {
                    self.log(
                        DebugCategory::Choice,
                        LogLevel::Info,
                        &format!(
                            "[Gate] graded correct={} score={} contraindicated={} selected={:?}",
                            verdict.correct,
                            verdict.score,
                            verdict.contraindicated,
                            verdict.selected
                        ),
                    );
                }
                self.navigate(Navigation::Restart {
                    timeline: destination,
                })
            }
            GateResponse::Fallback { .. } => {
                self.log(
                    DebugCategory::Choice,
                    LogLevel::Warn,
                    "[Gate] empty destination key, re-enabling hit area",
                );
                self.set_advance_enabled(true);
                Progress::WaitInput
            }
        };
        self.settle(progress)
    }

    /// Feed elapsed host time to the typing reveal
    pub fn tick(&mut self, elapsed: Duration) -> Progress {
        if self.navigation.is_some() {
            return Progress::Finished;
        }
        let Some(reveal) = self.typing.as_mut() else {
            return self.progress.clone();
        };
        if reveal.tick(elapsed) {
            self.surface.set_dialog_text(reveal.visible(), &self.dialog_style);
        }
        if reveal.is_complete() {
            // Completion only stops the reveal; moving on still needs input
            self.typing = None;
            return self.settle(Progress::WaitInput);
        }
        Progress::Typing
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timeline_key(&self) -> Option<&str> {
        self.timeline_key.as_deref()
    }

    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            timeline_key: self.timeline_key.clone(),
            index: self.index,
        }
    }

    /// Snapshot that replays the event currently waited on
    ///
    /// [`snapshot`](Self::snapshot) points past a blocking event once it has
    /// been dispatched; resuming there would skip the line or gate on screen.
    pub fn resume_point(&self) -> CursorSnapshot {
        let index = match self.progress {
            Progress::Typing | Progress::WaitInput | Progress::WaitChoice | Progress::Stalled => {
                self.index.saturating_sub(1)
            }
            Progress::Ended | Progress::Navigate(_) | Progress::Finished => self.index,
        };
        CursorSnapshot {
            timeline_key: self.timeline_key.clone(),
            index,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    pub fn typing(&self) -> Option<&TypingReveal> {
        self.typing.as_ref()
    }

    pub fn gate(&self) -> Option<&Gate> {
        self.gate.as_ref()
    }

    pub fn is_advance_enabled(&self) -> bool {
        self.advance_enabled
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        self.navigation.as_ref()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &*self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut *self.surface
    }

    fn settle(&mut self, progress: Progress) -> Progress {
        self.progress = progress.clone();
        progress
    }

    fn set_advance_enabled(&mut self, enabled: bool) {
        self.advance_enabled = enabled;
        self.surface.set_advance_enabled(enabled);
    }

    fn navigate(&mut self, navigation: Navigation) -> Progress {
        self.log(
            DebugCategory::Flow,
            LogLevel::Info,
            &format!("[Navigate] {:?}", navigation),
        );
        self.navigation = Some(navigation.clone());
        Progress::Navigate(navigation)
    }

    /// Consume events until one blocks or the timeline ends
    fn run(&mut self) -> Progress {
        let Some(timeline) = self.timeline else {
            return Progress::Ended;
        };
        loop {
            let Some(event) = timeline.get(self.index) else {
                self.log(
                    DebugCategory::Engine,
                    LogLevel::Info,
                    &format!("[Engine] reached end of timeline at index={}", self.index),
                );
                return Progress::Ended;
            };
            self.log(
                DebugCategory::Engine,
                LogLevel::Trace,
                &format!("[Engine] index={} event={}", self.index, event.tag()),
            );
            self.index += 1;
            match event.pacing() {
                Pacing::Immediate => self.apply(event),
                Pacing::Blocking => return self.block(event),
            }
        }
    }

    /// Dispatch a blocking event and report what it waits for
    fn block(&mut self, event: &Event) -> Progress {
        let canvas = self.surface.canvas();
        match event {
            Event::SetDialog(line) => {
                let actor_style =
                    TextStyle::new(line.actor_fill_color.clone(), line.actor_fill_alpha);
                match &line.actor_name {
                    Some(name) if !name.is_empty() => {
                        self.surface.set_actor_name(name, &actor_style)
                    }
                    _ => self.surface.clear_actor_name(),
                }
                self.dialog_style =
                    TextStyle::new(line.text_fill_color.clone(), line.text_fill_alpha);
                self.surface.set_dialog_text("", &self.dialog_style);

                let reveal = TypingReveal::new(line.text.as_str(), self.config.typing_interval());
                if reveal.is_complete() {
                    return Progress::WaitInput;
                }
                self.typing = Some(reveal);
                Progress::Typing
            }
            Event::TimelineTransition(jump) => self.navigate(Navigation::Restart {
                timeline: jump.key.clone(),
            }),
            Event::SceneTransition(jump) => self.navigate(Navigation::Scene {
                scene: jump.key.clone(),
                data: jump.data.clone(),
            }),
            Event::Choice(set) => {
                if set.choices.is_empty() {
                    return Progress::WaitInput;
                }
                let gate = SingleChoiceGate::new(set.choices.clone());
                let buttons = gate.layout(&self.config.layout, canvas);
                self.open_gate(Gate::Single(gate), buttons)
            }
            Event::MultiChoice(set) => {
                if set.choices.is_empty() {
                    return Progress::WaitInput;
                }
                let gate = MultiChoiceGate::open(set, &mut self.rng);
                self.log(
                    DebugCategory::Choice,
                    LogLevel::Debug,
                    &format!("[Gate] multi-choice display order {:?}", gate.display_order()),
                );
                let buttons = gate.layout(&self.config.layout, canvas);
                self.open_gate(Gate::Multi(gate), buttons)
            }
            Event::ShowWebLink(link) => {
                self.surface.show_web_link(&WebLinkView {
                    url: link.url.clone(),
                    text: link.label().to_string(),
                    target: link.target().to_string(),
                });
                Progress::WaitInput
            }
            Event::Unknown => {
                self.log(
                    DebugCategory::Flow,
                    LogLevel::Warn,
                    &format!("[Engine] unknown event at index={}, stalling", self.index - 1),
                );
                Progress::Stalled
            }
            Event::ClearDialog
            | Event::SetBackground(_)
            | Event::ClearBackground
            | Event::SetFrame(_)
            | Event::AddForeground(_)
            | Event::ClearForeground
            | Event::PlaySound(_)
            | Event::ClearSound(_)
            | Event::HideWebLink => {
                self.apply(event);
                Progress::WaitInput
            }
        }
    }

    /// Apply an immediate event
    fn apply(&mut self, event: &Event) {
        let canvas = self.surface.canvas();
        match event {
            Event::ClearDialog => {
                self.surface.clear_actor_name();
                self.surface.clear_dialog_text();
            }
            Event::SetBackground(image) => {
                let fade = Fade::from_effect(image.effect.as_deref(), self.config.fade_duration());
                self.log(
                    DebugCategory::Layers,
                    LogLevel::Debug,
                    &format!("[Background] {} fade={:?}", image.key, fade),
                );
                self.surface
                    .set_background(&image.key, canvas.place(image.x, image.y), fade);
            }
            Event::ClearBackground => self.surface.clear_background(),
            Event::SetFrame(frame) => self.surface.set_frame(&frame.key, canvas.center()),
            Event::AddForeground(image) => {
                self.log(
                    DebugCategory::Layers,
                    LogLevel::Debug,
                    &format!("[Foreground] add {}", image.key),
                );
                self.surface
                    .add_foreground(&image.key, canvas.place(image.x, image.y));
            }
            Event::ClearForeground => self.surface.clear_foreground(),
            Event::HideWebLink => self.surface.hide_web_link(),
            Event::PlaySound(cue) => {
                if self.surface.is_sound_playing(&cue.key) {
                    self.log(
                        DebugCategory::Audio,
                        LogLevel::Debug,
                        &format!("[Sound] {} already playing", cue.key),
                    );
                } else {
                    self.surface.play_sound(&cue.key, cue.looping);
                }
            }
            Event::ClearSound(sound) => {
                if self.surface.is_sound_playing(&sound.key) {
                    self.surface.stop_sound(&sound.key);
                }
            }
            // Blocking events go through `block`
            Event::SetDialog(_)
            | Event::TimelineTransition(_)
            | Event::SceneTransition(_)
            | Event::Choice(_)
            | Event::MultiChoice(_)
            | Event::ShowWebLink(_)
            | Event::Unknown => {}
        }
    }

    fn open_gate(&mut self, gate: Gate, buttons: Vec<ButtonSpec>) -> Progress {
        // A fallback leaves the previous gate's buttons up, and ids restart at 0
        self.surface.clear_buttons();
        self.set_advance_enabled(false);
        for button in &buttons {
            self.surface.add_button(button);
        }
        self.log(
            DebugCategory::Choice,
            LogLevel::Debug,
            &format!("[Gate] opened with {} buttons", gate.button_count()),
        );
        self.gate = Some(gate);
        Progress::WaitChoice
    }

    fn log(&self, category: DebugCategory, level: LogLevel, message: &str) {
        debug::log(&self.config.debug, category, level, message);
    }
}
