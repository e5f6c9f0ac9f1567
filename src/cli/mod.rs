//! Terminal host for the timeline player
//!
//! The host owns the scene-level contract the interpreter leaves open: it
//! builds a fresh [`TimelinePlayer`](crate::runtime::TimelinePlayer) per
//! activation and decides what a [`Navigation`] means.

use serde_json::Value;

use crate::runtime::Navigation;

pub mod dump;
pub mod play;
pub mod view_state;

/// Scene that hosts timeline playback; entering it restarts with `data.id`
pub const MAIN_SCENE: &str = "main";
/// Scene shown once the scenario is over
pub const ENDING_SCENE: &str = "ending";
/// Timeline the main scene falls back to when no `id` is passed
pub const DEFAULT_TIMELINE: &str = "start";

pub const ENDING_MESSAGE: &str = "The role-play has ended.\nThank you for playing.";

/// What the host does with a navigation request
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Tear down and start the named timeline on a cleared surface
    Restart(String),
    /// Show the ending scene
    Ending,
    /// Leave for a scene this host does not provide
    Exit { scene: String, data: Option<Value> },
}

pub fn route(navigation: Navigation) -> Route {
    match navigation {
        Navigation::Restart { timeline } => Route::Restart(timeline),
        Navigation::Scene { scene, data } => match scene.as_str() {
            MAIN_SCENE => {
                let timeline = data
                    .as_ref()
                    .and_then(|data| data.get("id"))
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_TIMELINE);
                Route::Restart(timeline.to_string())
            }
            ENDING_SCENE => Route::Ending,
            _ => Route::Exit { scene, data },
        },
    }
}
