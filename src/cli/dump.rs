//! Headless run that records every surface command
//!
//! Pointer downs are issued automatically until the timeline opens a gate,
//! ends or navigates, which makes the output stable enough to diff.

use serde::Serialize;

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::recording::{RecordingSurface, SurfaceCommand};
use crate::runtime::{CursorSnapshot, Navigation, Progress, TimelinePlayer};
use crate::surface::CanvasSize;
use crate::types::TimelineRegistry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// A choice gate is waiting for a button
    Gate,
    /// The timeline ran out of events
    Ended,
    Navigate { navigation: Navigation },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpReport {
    pub timeline: String,
    pub cursor: CursorSnapshot,
    pub stopped: StopReason,
    /// Pointer downs issued along the way
    pub advances: usize,
    pub commands: Vec<SurfaceCommand>,
}

pub fn run_dump(
    registry: &TimelineRegistry,
    config: &PlayerConfig,
    start: &str,
) -> Result<DumpReport, PlayerError> {
    let canvas = CanvasSize::new(config.canvas_width, config.canvas_height);
    let mut surface = RecordingSurface::new(canvas);

    let (cursor, stopped, advances) = {
        let mut player = TimelinePlayer::new(&mut surface, config.clone());
        let mut progress = player.start_key(registry, start)?;
        let mut advances = 0;

        let stopped = loop {
            match progress {
                Progress::Typing | Progress::WaitInput | Progress::Stalled => {
                    advances += 1;
                    progress = player.advance();
                }
                Progress::WaitChoice => break StopReason::Gate,
                Progress::Ended | Progress::Finished => break StopReason::Ended,
                Progress::Navigate(navigation) => break StopReason::Navigate { navigation },
            }
        };
        (player.snapshot(), stopped, advances)
    };

    Ok(DumpReport {
        timeline: start.to_string(),
        cursor,
        stopped,
        advances,
        commands: surface.take_commands(),
    })
}
