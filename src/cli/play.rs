//! Terminal player mode for running timelines
//!
//! This module provides an interactive player where users can step through a
//! timeline registry in the terminal. Each activation gets a fresh
//! [`TimelinePlayer`] over a [`RecordingSurface`]; recorded commands are
//! folded into a [`ViewState`] and only the changes are printed.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use crate::cli::view_state::{ViewState, render_delta};
use crate::cli::{DEFAULT_TIMELINE, ENDING_MESSAGE, Route, route};
use crate::config::PlayerConfig;
use crate::recording::RecordingSurface;
use crate::runtime::gate::Gate;
use crate::runtime::{CursorSnapshot, Navigation, Progress, TimelinePlayer};
use crate::surface::{ButtonId, ButtonRole, ButtonState, CanvasSize};
use crate::types::TimelineRegistry;

/// Restarts allowed in a row without reading any input
const MAX_IDLE_RESTARTS: usize = 64;

#[derive(Debug, Clone)]
pub struct PlayOptions {
    /// Timeline to start with
    pub start: String,
    /// Event index to resume the first timeline at
    pub from: Option<usize>,
    /// Show cursor and audio state after every step
    pub debug: bool,
    /// Reveal dialog with real typing delays
    pub animate: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            start: DEFAULT_TIMELINE.to_string(),
            from: None,
            debug: false,
            animate: true,
        }
    }
}

/// How a play session ended
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// The user quit; the snapshot replays the event that was waiting
    Quit(CursorSnapshot),
    /// A timeline ran out of events
    Ended(CursorSnapshot),
    /// The ending scene was reached
    Ending,
    /// A scene this host does not provide was requested
    Scene {
        scene: String,
        data: Option<serde_json::Value>,
    },
}

enum Activation {
    Restart(String),
    Done(PlayOutcome),
}

#[derive(Debug, PartialEq)]
enum Command {
    Advance,
    Press(usize),
    Confirm,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "" => Command::Advance,
        "q" => Command::Quit,
        "c" => Command::Confirm,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=9).contains(&n) => Command::Press(n - 1),
            _ => Command::Unknown(other.to_string()),
        },
    }
}

/// Run the player mode until the user quits or the host has nowhere to go
pub fn run_play<R: BufRead, W: Write>(
    registry: &TimelineRegistry,
    config: &PlayerConfig,
    options: &PlayOptions,
    input: R,
    output: W,
) -> anyhow::Result<PlayOutcome> {
    Host {
        registry,
        config,
        options,
        input,
        out: output,
        view: ViewState::new(),
        reads: 0,
    }
    .run()
}

struct Host<'r, R, W> {
    registry: &'r TimelineRegistry,
    config: &'r PlayerConfig,
    options: &'r PlayOptions,
    input: R,
    out: W,
    view: ViewState,
    reads: usize,
}

type Player<'a> = TimelinePlayer<'a, RecordingSurface>;

impl<R: BufRead, W: Write> Host<'_, R, W> {
    fn run(mut self) -> anyhow::Result<PlayOutcome> {
        // Fail before printing anything if the entry point is wrong
        self.registry.get(&self.options.start)?;

        writeln!(self.out, "=== emaki Timeline Player ===")?;
        writeln!(self.out)?;
        writeln!(self.out, "Controls:")?;
        writeln!(self.out, "  Enter: next")?;
        writeln!(self.out, "  1-9:   select / toggle option")?;
        writeln!(self.out, "  c:     confirm selection")?;
        writeln!(self.out, "  q:     quit")?;
        writeln!(self.out)?;

        let canvas = CanvasSize::new(self.config.canvas_width, self.config.canvas_height);
        let mut surface = RecordingSurface::new(canvas);
        let mut key = self.options.start.clone();
        let mut from = self.options.from;
        let mut idle_restarts = 0;

        loop {
            // A restart drops the previous activation's renderables, not its sounds
            surface.reset_scene();
            self.view.reset_scene();
            let reads = self.reads;

            match self.activate(&mut surface, &key, from.take())? {
                Activation::Restart(next) => {
                    log::info!(target: "emaki::host", "restarting with timeline '{}'", next);
                    idle_restarts = if self.reads == reads {
                        idle_restarts + 1
                    } else {
                        0
                    };
                    if idle_restarts > MAX_IDLE_RESTARTS {
                        anyhow::bail!(
                            "timeline '{}' keeps restarting without waiting for input",
                            next
                        );
                    }
                    key = next;
                }
                Activation::Done(outcome) => return Ok(outcome),
            }
        }
    }

    fn activate(
        &mut self,
        surface: &mut RecordingSurface,
        key: &str,
        from: Option<usize>,
    ) -> anyhow::Result<Activation> {
        let registry = self.registry;
        let mut player = TimelinePlayer::new(surface, self.config.clone());
        let mut progress = match from {
            Some(index) => player.resume(
                registry,
                &CursorSnapshot {
                    timeline_key: Some(key.to_string()),
                    index,
                },
            )?,
            None => player.start_key(registry, key)?,
        };

        loop {
            if progress == Progress::Typing {
                progress = self.reveal(&mut player)?;
            }
            self.flush(&mut player)?;
            if self.options.debug {
                self.show_debug(&player)?;
            }

            match progress {
                Progress::Navigate(navigation) => return Ok(self.follow(navigation)?),
                Progress::Ended | Progress::Finished => {
                    writeln!(self.out, "== END OF TIMELINE ==")?;
                    return Ok(Activation::Done(PlayOutcome::Ended(player.snapshot())));
                }
                Progress::WaitChoice => self.show_buttons(&player)?,
                Progress::Stalled => {
                    writeln!(self.out, "(unsupported event, press Enter to skip)")?;
                }
                Progress::Typing | Progress::WaitInput => {}
            }

            progress = match self.read_command()? {
                Command::Quit => {
                    writeln!(self.out, "Goodbye!")?;
                    return Ok(Activation::Done(PlayOutcome::Quit(player.resume_point())));
                }
                Command::Advance => player.advance(),
                Command::Press(index) => self.press(&mut player, ButtonId(index))?,
                Command::Confirm => match player.gate() {
                    Some(Gate::Multi(gate)) => {
                        let confirm = gate.confirm_button();
                        self.press(&mut player, confirm)?
                    }
                    _ => {
                        writeln!(self.out, "Nothing to confirm.")?;
                        player.progress().clone()
                    }
                },
                Command::Unknown(text) => {
                    writeln!(
                        self.out,
                        "Invalid input '{}'. Press Enter, 1-9, 'c' or 'q'.",
                        text
                    )?;
                    player.progress().clone()
                }
            };
        }
    }

    /// Bring a typing reveal to completion, in real time when animating
    fn reveal(&mut self, player: &mut Player<'_>) -> anyhow::Result<Progress> {
        let interval = player.config().typing_interval();

        if !self.options.animate {
            let remaining = player
                .typing()
                .map(|reveal| {
                    let left = reveal.char_count() - reveal.shown_chars();
                    interval.saturating_mul(u32::try_from(left).unwrap_or(u32::MAX))
                })
                .unwrap_or_default();
            return Ok(player.tick(remaining));
        }

        // Effects and the speaker go out before the first character
        self.flush(player)?;

        let step = interval.max(Duration::from_millis(1));
        let mut printed = 0;
        let mut last = Instant::now();
        let mut progress = Progress::Typing;
        while progress == Progress::Typing {
            std::thread::sleep(step);
            let now = Instant::now();
            progress = player.tick(now.duration_since(last));
            last = now;

            let fresh: String = player.surface().dialog_text.chars().skip(printed).collect();
            printed += fresh.chars().count();
            write!(self.out, "{}", fresh)?;
            self.out.flush()?;
        }
        writeln!(self.out)?;
        writeln!(self.out)?;

        // Already on screen, so fold without printing
        let commands = player.surface_mut().take_commands();
        self.view.apply_commands(&commands, player.timeline_key());
        Ok(progress)
    }

    fn flush(&mut self, player: &mut Player<'_>) -> io::Result<()> {
        let commands = player.surface_mut().take_commands();
        let delta = self.view.apply_commands(&commands, player.timeline_key());
        render_delta(&mut self.out, &delta)
    }

    fn press(&mut self, player: &mut Player<'_>, id: ButtonId) -> io::Result<Progress> {
        let progress = player.press(id);
        // Rejected presses leave the surface untouched
        if progress == Progress::WaitChoice && player.surface().commands().is_empty() {
            writeln!(self.out, "(not accepted)")?;
        }
        Ok(progress)
    }

    fn follow(&mut self, navigation: Navigation) -> io::Result<Activation> {
        Ok(match route(navigation) {
            Route::Restart(timeline) => Activation::Restart(timeline),
            Route::Ending => {
                writeln!(self.out)?;
                writeln!(self.out, "{}", ENDING_MESSAGE)?;
                writeln!(self.out)?;
                writeln!(self.out, "== THE END ==")?;
                Activation::Done(PlayOutcome::Ending)
            }
            Route::Exit { scene, data } => {
                writeln!(self.out, "[Scene: {}]", scene)?;
                Activation::Done(PlayOutcome::Scene { scene, data })
            }
        })
    }

    fn show_buttons(&mut self, player: &Player<'_>) -> io::Result<()> {
        writeln!(self.out, "--- Choice ---")?;
        for (button, state) in &player.surface().buttons {
            match button.role {
                ButtonRole::Choice => {
                    writeln!(self.out, "{}. {}", button.id.0 + 1, button.label)?;
                }
                ButtonRole::Toggle => {
                    let mark = if *state == ButtonState::Selected { 'x' } else { ' ' };
                    writeln!(self.out, "{}. [{}] {}", button.id.0 + 1, mark, button.label)?;
                }
                ButtonRole::Confirm => writeln!(self.out, "c. {}", button.label)?,
            }
        }
        writeln!(self.out)
    }

    /// Display debug information (only when --debug is set)
    fn show_debug(&mut self, player: &Player<'_>) -> io::Result<()> {
        writeln!(self.out, "[debug]")?;
        writeln!(
            self.out,
            "timeline={} index={} progress={:?}",
            player.timeline_key().unwrap_or("-"),
            player.index(),
            player.progress()
        )?;
        let images: Vec<String> = player
            .surface()
            .images()
            .into_iter()
            .map(|(layer, image)| format!("{}:{}", layer, image.key))
            .collect();
        writeln!(self.out, "images={:?}", images)?;
        let sounds: Vec<&str> = player.surface().sounds.keys().map(String::as_str).collect();
        writeln!(self.out, "sounds={:?}", sounds)?;
        writeln!(self.out)
    }

    fn read_command(&mut self) -> io::Result<Command> {
        write!(self.out, "> ")?;
        self.out.flush()?;

        let mut line = String::new();
        self.reads += 1;
        // End of input behaves like quitting
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Command::Quit);
        }
        Ok(parse_command(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_commands() {
        assert_eq!(parse_command("\n"), Command::Advance);
        assert_eq!(parse_command("q\n"), Command::Quit);
        assert_eq!(parse_command(" c "), Command::Confirm);
        assert_eq!(parse_command("1"), Command::Press(0));
        assert_eq!(parse_command("9"), Command::Press(8));
        assert_eq!(parse_command("0"), Command::Unknown("0".to_string()));
        assert_eq!(parse_command("next"), Command::Unknown("next".to_string()));
    }
}
