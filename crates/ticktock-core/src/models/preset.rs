//! Recently used countdown durations

use serde::{Deserialize, Serialize};

pub const MAX_PRESETS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub name: String,
}

impl Preset {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            name: format!("{}h {}m {}s", hours, minutes, seconds),
        }
    }

    pub fn matches(&self, hours: u32, minutes: u32, seconds: u32) -> bool {
        self.hours == hours && self.minutes == minutes && self.seconds == seconds
    }

    pub fn total_ms(&self) -> u64 {
        hms_to_ms(self.hours, self.minutes, self.seconds)
    }
}

pub fn hms_to_ms(hours: u32, minutes: u32, seconds: u32) -> u64 {
    (hours as u64 * 3600 + minutes as u64 * 60 + seconds as u64) * 1000
}

/// Newest-first list of at most [`MAX_PRESETS`] distinct durations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetLedger {
    presets: Vec<Preset>,
}

impl PresetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_presets(mut presets: Vec<Preset>) -> Self {
        presets.truncate(MAX_PRESETS);
        Self { presets }
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn get(&self, index: usize) -> Option<&Preset> {
        self.presets.get(index)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Remember a duration. Returns `false` when an identical preset is
    /// already present; the list is left untouched in that case.
    pub fn record(&mut self, hours: u32, minutes: u32, seconds: u32) -> bool {
        if self.presets.iter().any(|p| p.matches(hours, minutes, seconds)) {
            return false;
        }

        self.presets.insert(0, Preset::new(hours, minutes, seconds));
        self.presets.truncate(MAX_PRESETS);
        true
    }
}
