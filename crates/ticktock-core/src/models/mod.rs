pub mod lap;
pub mod pomodoro;
pub mod preset;
pub mod settings;
pub mod theme;
pub mod timer;

pub use lap::{Lap, LapLedger, PendingLapAction};
pub use pomodoro::{PomodoroCycle, PomodoroPhase};
pub use preset::{hms_to_ms, Preset, PresetLedger, MAX_PRESETS};
pub use settings::{
    CustomTimerSettings, PomodoroSettings, Settings, StopwatchSettings, ThemePreference,
    TimeFormat,
};
pub use theme::{Palette, Rgb, Theme};
pub use timer::{Advance, TimerMode, TimerState};
