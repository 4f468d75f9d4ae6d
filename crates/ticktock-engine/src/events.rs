//! Timer events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticktock_core::models::PomodoroPhase;

/// Which controller emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Stopwatch,
    Pomodoro,
    Custom,
}

impl TimerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::Stopwatch => "Stopwatch",
            TimerKind::Pomodoro => "Pomodoro",
            TimerKind::Custom => "Custom Timer",
        }
    }
}

/// Event emitted by a timer controller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    pub timer: TimerKind,
    pub timestamp: DateTime<Utc>,
}

/// Types of timer events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    Started,
    /// Carries the elapsed (stopwatch) or remaining (countdown) time.
    Paused { duration_ms: u64 },
    Reset,
    /// A countdown was loaded with a new total.
    DurationSet { total_ms: u64 },
    LapRecorded { number: u32, total_ms: u64, lap_ms: u64 },
    LapDeleted { number: u32 },
    LapsCleared,
    /// A countdown reached zero. Emitted once per run.
    CountdownCompleted,
    /// A Pomodoro phase ran out.
    PhaseCompleted {
        phase: PomodoroPhase,
        session_number: u32,
    },
    /// The Pomodoro timer loaded a new phase.
    PhaseChanged {
        new_phase: PomodoroPhase,
        session_number: u32,
    },
    AlarmStopped,
}

impl TimerEvent {
    pub fn new(event_type: TimerEventType, timer: TimerKind) -> Self {
        Self {
            event_type,
            timer,
            timestamp: Utc::now(),
        }
    }

    pub fn started(timer: TimerKind) -> Self {
        Self::new(TimerEventType::Started, timer)
    }

    pub fn paused(timer: TimerKind, duration_ms: u64) -> Self {
        Self::new(TimerEventType::Paused { duration_ms }, timer)
    }

    pub fn completed(timer: TimerKind) -> Self {
        Self::new(TimerEventType::CountdownCompleted, timer)
    }

    pub fn phase_changed(new_phase: PomodoroPhase, session_number: u32) -> Self {
        Self::new(
            TimerEventType::PhaseChanged {
                new_phase,
                session_number,
            },
            TimerKind::Pomodoro,
        )
    }

    /// Whether this event should reach the user as a notification.
    pub fn is_completion(&self) -> bool {
        matches!(
            self.event_type,
            TimerEventType::CountdownCompleted | TimerEventType::PhaseCompleted { .. }
        )
    }
}
