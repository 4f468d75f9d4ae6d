use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Stopwatch,
    Countdown,
}

/// Outcome of sampling a timer against the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Timer is not running; nothing changed.
    Idle,
    /// Timer is running; carries the current displayed duration.
    Running(u64),
    /// Countdown reached zero on this sample. Reported exactly once.
    Completed,
}

/// Running/paused timing state for one controller.
///
/// While running, the displayed duration is derived from `reference_ms`;
/// while paused, `duration_ms` is authoritative. For a stopwatch
/// `duration_ms` is the time accumulated before the current run segment
/// and the reference stays fixed for the whole segment. For a countdown
/// `duration_ms` is the remaining time and the reference moves forward on
/// every sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub is_running: bool,
    pub reference_ms: u64,
    pub duration_ms: u64,
    /// Last explicitly set countdown total. Always zero for a stopwatch.
    pub total_ms: u64,
    pub completed: bool,
}

impl TimerState {
    pub fn new_stopwatch() -> Self {
        Self::new(TimerMode::Stopwatch)
    }

    pub fn new_countdown() -> Self {
        Self::new(TimerMode::Countdown)
    }

    fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            is_running: false,
            reference_ms: 0,
            duration_ms: 0,
            total_ms: 0,
            completed: false,
        }
    }

    pub fn is_countdown(&self) -> bool {
        self.mode == TimerMode::Countdown
    }

    /// Load a new countdown total. Leaves the timer paused.
    pub fn set_total(&mut self, total_ms: u64) {
        debug_assert!(self.is_countdown(), "set_total on a stopwatch");
        self.is_running = false;
        self.total_ms = total_ms;
        self.duration_ms = total_ms;
        self.completed = false;
    }

    /// Returns `false` when already running or when a countdown has nothing
    /// left to count.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running || (self.is_countdown() && self.duration_ms == 0) {
            return false;
        }

        self.reference_ms = now_ms;
        self.is_running = true;
        self.completed = false;
        true
    }

    /// Fold the running segment into the stored duration and stop.
    pub fn pause(&mut self, now_ms: u64) -> Advance {
        if !self.is_running {
            return Advance::Idle;
        }

        let advance = self.sample(now_ms);

        if self.mode == TimerMode::Stopwatch {
            self.duration_ms = self.current_ms(now_ms);
            self.reference_ms = now_ms;
        }
        self.is_running = false;

        advance
    }

    /// Stop and restore the initial duration: zero for a stopwatch, the
    /// last set total for a countdown.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.completed = false;
        self.duration_ms = match self.mode {
            TimerMode::Stopwatch => 0,
            TimerMode::Countdown => self.total_ms,
        };
    }

    /// One refresh-loop step.
    pub fn sample(&mut self, now_ms: u64) -> Advance {
        if !self.is_running {
            return Advance::Idle;
        }

        match self.mode {
            TimerMode::Stopwatch => Advance::Running(self.current_ms(now_ms)),
            TimerMode::Countdown => {
                let elapsed = now_ms.saturating_sub(self.reference_ms);
                self.duration_ms = self.duration_ms.saturating_sub(elapsed);
                self.reference_ms = now_ms;

                if self.duration_ms == 0 {
                    self.is_running = false;
                    self.completed = true;
                    Advance::Completed
                } else {
                    Advance::Running(self.duration_ms)
                }
            }
        }
    }

    /// Displayed duration at `now_ms` without mutating state.
    pub fn current_ms(&self, now_ms: u64) -> u64 {
        if !self.is_running {
            return self.duration_ms;
        }

        let segment = now_ms.saturating_sub(self.reference_ms);
        match self.mode {
            TimerMode::Stopwatch => self.duration_ms + segment,
            TimerMode::Countdown => self.duration_ms.saturating_sub(segment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timers_are_zeroed() {
        let watch = TimerState::new_stopwatch();
        assert_eq!(watch.mode, TimerMode::Stopwatch);
        assert!(!watch.is_running);
        assert_eq!(watch.current_ms(1_000), 0);

        let countdown = TimerState::new_countdown();
        assert!(countdown.is_countdown());
        assert_eq!(countdown.total_ms, 0);
    }

    #[test]
    fn test_stopwatch_accumulates_across_pauses() {
        let mut watch = TimerState::new_stopwatch();
        assert!(watch.start(1_000));
        assert_eq!(watch.sample(1_500), Advance::Running(500));

        watch.pause(1_700);
        assert_eq!(watch.current_ms(9_999), 700);

        assert!(watch.start(5_000));
        assert_eq!(watch.sample(5_300), Advance::Running(1_000));
        assert_eq!(watch.current_ms(5_300), 1_000);
    }

    #[test]
    fn test_stopwatch_tolerates_irregular_ticks() {
        let mut watch = TimerState::new_stopwatch();
        watch.start(0);
        for now in [3, 40, 41, 200, 1_999] {
            watch.sample(now);
        }
        assert_eq!(watch.sample(2_000), Advance::Running(2_000));
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut watch = TimerState::new_stopwatch();
        assert!(watch.start(0));
        assert!(!watch.start(500));
        assert_eq!(watch.reference_ms, 0);
    }

    #[test]
    fn test_pause_not_running_is_noop() {
        let mut watch = TimerState::new_stopwatch();
        assert_eq!(watch.pause(100), Advance::Idle);
        assert_eq!(watch.duration_ms, 0);
    }

    #[test]
    fn test_countdown_zero_does_not_start() {
        let mut countdown = TimerState::new_countdown();
        assert!(!countdown.start(0));
        assert!(!countdown.is_running);
    }

    #[test]
    fn test_countdown_incremental_sampling() {
        let mut countdown = TimerState::new_countdown();
        countdown.set_total(5_000);
        countdown.start(100);

        assert_eq!(countdown.sample(1_100), Advance::Running(4_000));
        assert_eq!(countdown.reference_ms, 1_100);
        assert_eq!(countdown.sample(2_100), Advance::Running(3_000));
    }

    #[test]
    fn test_countdown_completes_once_without_going_negative() {
        let mut countdown = TimerState::new_countdown();
        countdown.set_total(1_000);
        countdown.start(0);

        assert_eq!(countdown.sample(10_000), Advance::Completed);
        assert_eq!(countdown.duration_ms, 0);
        assert!(countdown.completed);
        assert!(!countdown.is_running);

        assert_eq!(countdown.sample(20_000), Advance::Idle);
        assert!(!countdown.start(20_000));
    }

    #[test]
    fn test_zero_length_pause_resume_cycles_preserve_remaining() {
        let mut cycled = TimerState::new_countdown();
        cycled.set_total(60_000);
        cycled.start(0);
        cycled.sample(1_000);
        for _ in 0..10 {
            cycled.pause(2_000);
            cycled.start(2_000);
        }
        cycled.sample(3_000);

        let mut straight = TimerState::new_countdown();
        straight.set_total(60_000);
        straight.start(0);
        straight.sample(1_000);
        straight.sample(3_000);

        assert_eq!(cycled.duration_ms, straight.duration_ms);
        assert_eq!(cycled.duration_ms, 57_000);
    }

    #[test]
    fn test_pause_can_complete_countdown() {
        let mut countdown = TimerState::new_countdown();
        countdown.set_total(500);
        countdown.start(0);
        assert_eq!(countdown.pause(800), Advance::Completed);
        assert!(countdown.completed);
    }

    #[test]
    fn test_reset_restores_last_total() {
        let mut countdown = TimerState::new_countdown();
        countdown.set_total(3_000);
        countdown.start(0);
        countdown.sample(3_500);
        assert!(countdown.completed);

        countdown.reset();
        assert_eq!(countdown.duration_ms, 3_000);
        assert!(!countdown.completed);

        let mut watch = TimerState::new_stopwatch();
        watch.start(0);
        watch.pause(400);
        watch.reset();
        assert_eq!(watch.current_ms(1_000), 0);
    }
}
