//! # emaki
//!
//! A data-driven timeline player for visual-novel-style presentations. A
//! timeline is a JSON list of narrative events (dialog, backgrounds, sounds,
//! choices, transitions); [`TimelinePlayer`] walks it and drives any
//! [`PresentationSurface`] the host provides.
//!
//! Immediate events run back to back. Blocking events (dialog lines, choice
//! gates, web links) stop the player until the host forwards input.
//!
//! ## Quick Start
//!
//! ```rust
//! use emaki::{ButtonId, Navigation, PlayerConfig, Progress, RecordingSurface};
//! use emaki::{TimelinePlayer, TimelineRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TimelineRegistry::from_json(
//!     r#"{
//!         "timelines": {
//!             "start": [
//!                 { "event": "dialog", "text": "Hello!", "actorName": "Guide" },
//!                 { "event": "choice", "choices": [
//!                     { "text": "Again", "key": "start" },
//!                     { "text": "Leave", "key": "outro" }
//!                 ] }
//!             ]
//!         }
//!     }"#,
//! )?;
//!
//! let mut surface = RecordingSurface::default();
//! let mut player = TimelinePlayer::new(&mut surface, PlayerConfig::default());
//!
//! assert_eq!(player.start_key(&registry, "start")?, Progress::Typing);
//! // The first pointer down completes the line, the second moves on
//! player.advance();
//! assert_eq!(player.advance(), Progress::WaitChoice);
//! assert_eq!(player.surface().buttons.len(), 2);
//!
//! match player.press(ButtonId(1)) {
//!     Progress::Navigate(Navigation::Restart { timeline }) => assert_eq!(timeline, "outro"),
//!     other => panic!("unexpected progress: {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Loading from disk
//!
//! ```rust,no_run
//! use emaki::{FileSystemRepository, RegistryRepository};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = FileSystemRepository::new("scenarios");
//! let registry = repo.load_registry("sample").await?;
//! println!("{} timelines", registry.timelines.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lint;
pub mod recording;
pub mod repository;
pub mod runtime;
pub mod storage;
pub mod surface;
pub mod types;

pub use config::{GateLayout, PlayerConfig};
pub use error::PlayerError;
pub use lint::{LintIssue, LintLevel, LintResult, lint};
pub use recording::{RecordingSurface, SurfaceCommand};
pub use repository::{
    FileSystemRepository, InMemoryRepository, RegistryRepository, RepositoryError,
    SnapshotRepository,
};
pub use runtime::{CursorSnapshot, Navigation, Progress, TimelinePlayer};
pub use surface::{
    ButtonId, ButtonRole, ButtonSpec, ButtonState, CanvasSize, Fade, Layer, Position,
    PresentationSurface, TextStyle, WebLinkView,
};
pub use types::{Event, Timeline, TimelineRegistry};
