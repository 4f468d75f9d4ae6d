//! Application settings

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: ThemePreference,
    pub notifications: bool,
    pub keep_screen_awake: bool,
    pub pomodoro: PomodoroSettings,
    pub custom_timer: CustomTimerSettings,
    pub stopwatch: StopwatchSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    System,
    Light,
    Dark,
}

/// Durations are in minutes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_duration: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub sessions_until_long_break: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomTimerSettings {
    pub auto_start_break: bool,
    /// Minutes.
    pub default_break_duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchSettings {
    pub auto_lap: bool,
    pub format: TimeFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    Hms,
    Dhms,
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(Error::Validation(format!(
            "{} must be between {} and {} (got {})",
            name, min, max, value
        )));
    }
    Ok(())
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.pomodoro.validate()?;
        self.custom_timer.validate()?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            notifications: true,
            keep_screen_awake: false,
            pomodoro: PomodoroSettings::default(),
            custom_timer: CustomTimerSettings::default(),
            stopwatch: StopwatchSettings::default(),
        }
    }
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::System => "System",
            ThemePreference::Light => "Light",
            ThemePreference::Dark => "Dark",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemePreference::System => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
        }
    }
}

impl PomodoroSettings {
    pub fn validate(&self) -> Result<()> {
        check_range("Work duration", self.work_duration, 1, 60)?;
        check_range("Short break", self.short_break, 1, 30)?;
        check_range("Long break", self.long_break, 1, 60)?;
        check_range(
            "Sessions until long break",
            self.sessions_until_long_break,
            2,
            10,
        )?;
        Ok(())
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break: 5,
            long_break: 15,
            sessions_until_long_break: 4,
        }
    }
}

impl CustomTimerSettings {
    pub fn validate(&self) -> Result<()> {
        check_range("Default break duration", self.default_break_duration, 1, 30)
    }
}

impl Default for CustomTimerSettings {
    fn default() -> Self {
        Self {
            auto_start_break: false,
            default_break_duration: 5,
        }
    }
}

impl Default for StopwatchSettings {
    fn default() -> Self {
        Self {
            auto_lap: false,
            format: TimeFormat::Hms,
        }
    }
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::Hms => "HH:MM:SS.ms",
            TimeFormat::Dhms => "DD:HH:MM:SS.ms",
        }
    }
}
