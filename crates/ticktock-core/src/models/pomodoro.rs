use serde::{Deserialize, Serialize};

use super::PomodoroSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

/// Where the user is in the work/break rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroCycle {
    pub phase: PomodoroPhase,
    pub session: u32,
}

impl PomodoroPhase {
    /// Phase length in minutes.
    pub fn minutes(&self, settings: &PomodoroSettings) -> u32 {
        match self {
            PomodoroPhase::Work => settings.work_duration,
            PomodoroPhase::ShortBreak => settings.short_break,
            PomodoroPhase::LongBreak => settings.long_break,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "Work",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, PomodoroPhase::Work)
    }

    pub fn is_break(&self) -> bool {
        !self.is_work()
    }
}

impl PomodoroCycle {
    pub fn new() -> Self {
        Self {
            phase: PomodoroPhase::Work,
            session: 1,
        }
    }

    /// The break that follows the current work session.
    pub fn upcoming_break(&self, settings: &PomodoroSettings) -> PomodoroPhase {
        if self.session >= settings.sessions_until_long_break {
            PomodoroPhase::LongBreak
        } else {
            PomodoroPhase::ShortBreak
        }
    }

    /// Move to the next phase after the current one finished.
    pub fn advance(&mut self, settings: &PomodoroSettings) {
        let (phase, session) = match self.phase {
            PomodoroPhase::Work => (self.upcoming_break(settings), self.session),
            PomodoroPhase::ShortBreak => (PomodoroPhase::Work, self.session + 1),
            PomodoroPhase::LongBreak => (PomodoroPhase::Work, 1),
        };
        self.phase = phase;
        self.session = session;
    }
}

impl Default for PomodoroCycle {
    fn default() -> Self {
        Self::new()
    }
}
