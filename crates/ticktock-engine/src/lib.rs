//! TickTock timer engine
//!
//! Controllers for the stopwatch, the Pomodoro timer and the custom
//! countdown, plus the shared sound, theme and settings components. Build
//! everything at once through [`TimerSuite`].

pub mod clock;
pub mod custom;
pub mod error;
pub mod events;
pub mod pomodoro;
pub mod settings;
pub mod sound;
pub mod stopwatch;
pub mod suite;
pub mod theme;
pub mod ticker;

pub use clock::TokioClock;
pub use custom::{CustomTimerController, CustomTimerSnapshot};
pub use error::{SettingsError, TimerError};
pub use events::{TimerEvent, TimerEventType, TimerKind};
pub use pomodoro::{PomodoroController, PomodoroSnapshot};
pub use settings::SettingsManager;
pub use sound::{AudioSink, PlaybackError, SilentSink, SoundController};
pub use stopwatch::{StopwatchController, StopwatchSnapshot};
pub use suite::TimerSuite;
pub use theme::ThemeController;
pub use ticker::TickHandle;

use std::time::Duration;

/// How often a running controller samples its clock.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);
