//! Small single-purpose preferences: sound, theme, Pomodoro durations

use super::{keys, KeyValueStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_VOLUME: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundPrefs {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for SoundPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: DEFAULT_VOLUME,
        }
    }
}

#[derive(Clone)]
pub struct SoundStorage {
    store: Arc<dyn KeyValueStore>,
}

impl SoundStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Sound is on unless explicitly stored as `"false"`. A missing or
    /// unparsable volume reads as the default.
    pub fn load(&self) -> Result<SoundPrefs> {
        let enabled = self.store.get(keys::SOUND_ENABLED)?.as_deref() != Some("false");
        let volume = self
            .store
            .get(keys::SOUND_VOLUME)?
            .and_then(|raw| raw.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_VOLUME);

        Ok(SoundPrefs { enabled, volume })
    }

    pub fn save_enabled(&self, enabled: bool) -> Result<()> {
        self.store.set(keys::SOUND_ENABLED, &enabled.to_string())
    }

    pub fn save_volume(&self, volume: f32) -> Result<()> {
        self.store.set(keys::SOUND_VOLUME, &volume.to_string())
    }
}

#[derive(Clone)]
pub struct ThemeStorage {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// `None` when the user never picked a theme explicitly.
    pub fn load_dark_mode(&self) -> Result<Option<bool>> {
        Ok(match self.store.get(keys::DARK_MODE)?.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        })
    }

    pub fn save_dark_mode(&self, dark: bool) -> Result<()> {
        self.store.set(keys::DARK_MODE, &dark.to_string())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::DARK_MODE)
    }
}

/// Minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroDurations {
    pub default_duration: u32,
    pub current_duration: u32,
}

#[derive(Clone)]
pub struct PomodoroStorage {
    store: Arc<dyn KeyValueStore>,
}

impl PomodoroStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Result<Option<PomodoroDurations>> {
        match self.store.get(keys::POMODORO)? {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    pub fn save(&self, durations: &PomodoroDurations) -> Result<()> {
        let content = serde_json::to_string(durations)?;
        self.store.set(keys::POMODORO, &content)
    }
}
