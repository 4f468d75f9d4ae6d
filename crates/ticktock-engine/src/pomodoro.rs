//! Pomodoro countdown with work/break rotation

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

use ticktock_core::{
    format::format_countdown_ms,
    models::{Advance, PomodoroCycle, PomodoroPhase, PomodoroSettings, TimerState},
    storage::{PomodoroDurations, PomodoroStorage},
    Clock,
};

use crate::events::{TimerEvent, TimerEventType, TimerKind};
use crate::sound::SoundController;
use crate::ticker::TickHandle;
use crate::DEFAULT_TICK_INTERVAL;

/// How long the completion alarm rings before stopping on its own.
pub const ALARM_AUTO_STOP: Duration = Duration::from_secs(10);

fn minutes_ms(minutes: u32) -> u64 {
    minutes as u64 * 60_000
}

#[derive(Debug, Clone, PartialEq)]
pub struct PomodoroSnapshot {
    pub is_running: bool,
    pub remaining_ms: u64,
    pub display: String,
    pub phase: PomodoroPhase,
    pub session: u32,
    pub sessions_until_long_break: u32,
    pub current_minutes: u32,
    pub default_minutes: u32,
    /// Set after a work session ends, until a break or another session
    /// is started.
    pub suggested_break: Option<PomodoroPhase>,
    pub completed: bool,
}

struct PomodoroInner {
    state: TimerState,
    settings: PomodoroSettings,
    /// Phase of the duration currently loaded.
    cycle: PomodoroCycle,
    default_minutes: u32,
    /// Work session length in minutes.
    current_minutes: u32,
    suggested_break: Option<PomodoroPhase>,
    epoch: u64,
    ticker: Option<TickHandle>,
}

impl PomodoroInner {
    fn halt(&mut self) {
        self.epoch += 1;
        self.ticker = None;
    }

    fn load_phase(&mut self, phase: PomodoroPhase) {
        self.cycle.phase = phase;
        let minutes = match phase {
            PomodoroPhase::Work => self.current_minutes,
            _ => phase.minutes(&self.settings),
        };
        self.state.set_total(minutes_ms(minutes));
    }
}

struct Shared {
    inner: Mutex<PomodoroInner>,
    clock: Arc<dyn Clock>,
    storage: PomodoroStorage,
    sound: SoundController,
    event_tx: broadcast::Sender<TimerEvent>,
    tick_interval: Duration,
}

impl Shared {
    fn emit(&self, event: TimerEvent) {
        let _ = self.event_tx.send(event);
    }

    fn persist(&self, inner: &PomodoroInner) {
        let durations = PomodoroDurations {
            default_duration: inner.default_minutes,
            current_duration: inner.current_minutes,
        };
        if let Err(e) = self.storage.save(&durations) {
            tracing::warn!("Failed to save Pomodoro durations: {}", e);
        }
    }

    fn begin(self: &Arc<Self>, inner: &mut PomodoroInner) -> bool {
        if !inner.state.start(self.clock.now_ms()) {
            return false;
        }
        inner.epoch += 1;
        let epoch = inner.epoch;
        inner.ticker = Some(TickHandle::spawn_for(
            self,
            self.tick_interval,
            move |shared| async move { shared.tick(epoch).await },
        ));
        self.sound.play();
        self.emit(TimerEvent::started(TimerKind::Pomodoro));
        true
    }

    async fn tick(self: Arc<Self>, epoch: u64) -> ControlFlow<()> {
        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch {
            return ControlFlow::Break(());
        }

        match inner.state.sample(self.clock.now_ms()) {
            Advance::Running(_) => ControlFlow::Continue(()),
            Advance::Completed => {
                inner.ticker = None;
                self.complete(&mut inner);
                ControlFlow::Break(())
            }
            Advance::Idle => ControlFlow::Break(()),
        }
    }

    fn complete(&self, inner: &mut PomodoroInner) {
        let finished = inner.cycle.phase;
        let session = inner.cycle.session;
        tracing::info!("Pomodoro {} finished (session {})", finished.as_str(), session);

        self.emit(TimerEvent::new(
            TimerEventType::PhaseCompleted {
                phase: finished,
                session_number: session,
            },
            TimerKind::Pomodoro,
        ));

        if finished.is_work() {
            inner.suggested_break = Some(inner.cycle.upcoming_break(&inner.settings));
        } else {
            let settings = inner.settings.clone();
            inner.cycle.advance(&settings);
            inner.load_phase(PomodoroPhase::Work);
            self.emit(TimerEvent::phase_changed(
                inner.cycle.phase,
                inner.cycle.session,
            ));
        }

        let generation = self.sound.play_alarm();
        self.sound.stop_after(generation, ALARM_AUTO_STOP);
    }
}

/// Pomodoro countdown. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct PomodoroController {
    shared: Arc<Shared>,
}

impl PomodoroController {
    pub fn new(
        clock: Arc<dyn Clock>,
        storage: PomodoroStorage,
        sound: SoundController,
        event_tx: broadcast::Sender<TimerEvent>,
    ) -> Self {
        let settings = PomodoroSettings::default();
        let stored = storage.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load Pomodoro durations, using defaults: {}", e);
            None
        });

        let default_minutes = match stored {
            Some(d) if d.default_duration > 0 => d.default_duration,
            _ => settings.work_duration,
        };
        let current_minutes = match stored {
            Some(d) if d.current_duration > 0 => d.current_duration,
            _ => default_minutes,
        };

        let mut state = TimerState::new_countdown();
        state.set_total(minutes_ms(current_minutes));

        let inner = PomodoroInner {
            state,
            settings,
            cycle: PomodoroCycle::new(),
            default_minutes,
            current_minutes,
            suggested_break: None,
            epoch: 0,
            ticker: None,
        };

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                clock,
                storage,
                sound,
                event_tx,
                tick_interval: DEFAULT_TICK_INTERVAL,
            }),
        }
    }

    /// Load a work session of `minutes`; `0` means the default length.
    /// Returns the new total in milliseconds.
    pub async fn set_minutes(&self, minutes: u32) -> u64 {
        let mut inner = self.shared.inner.lock().await;
        let minutes = if minutes == 0 {
            inner.default_minutes
        } else {
            minutes
        };

        inner.halt();
        inner.current_minutes = minutes;
        inner.suggested_break = None;
        inner.load_phase(PomodoroPhase::Work);
        self.shared.persist(&inner);

        let total_ms = inner.state.total_ms;
        self.shared.emit(TimerEvent::new(
            TimerEventType::DurationSet { total_ms },
            TimerKind::Pomodoro,
        ));
        tracing::info!("Pomodoro set to {} minutes", minutes);
        total_ms
    }

    pub async fn start(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        self.shared.begin(&mut inner)
    }

    /// Pause the countdown. If the remaining time ran out since the last
    /// tick, the phase completes here instead.
    pub async fn pause(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        if !inner.state.is_running {
            return false;
        }

        let advance = inner.state.pause(self.shared.clock.now_ms());
        inner.halt();

        if advance == Advance::Completed {
            self.shared.complete(&mut inner);
        } else {
            self.shared
                .emit(TimerEvent::paused(TimerKind::Pomodoro, inner.state.duration_ms));
        }
        true
    }

    pub async fn toggle(&self) -> bool {
        if self.is_running().await {
            self.pause().await;
            false
        } else {
            self.start().await
        }
    }

    /// Stop and restore the full length of the loaded phase.
    pub async fn reset(&self) {
        let mut inner = self.shared.inner.lock().await;
        let was_completed = inner.state.completed;

        inner.halt();
        inner.state.reset();
        inner.suggested_break = None;
        if was_completed {
            self.shared.sound.stop();
        }
        self.shared.sound.play();

        self.shared
            .emit(TimerEvent::new(TimerEventType::Reset, TimerKind::Pomodoro));
    }

    /// Load and start the suggested break, or the upcoming one when no
    /// work session has just finished.
    pub async fn start_break(&self) -> PomodoroPhase {
        let mut inner = self.shared.inner.lock().await;
        inner.halt();
        self.shared.sound.stop();

        if inner.cycle.phase.is_work() {
            let upcoming = inner.cycle.upcoming_break(&inner.settings);
            let phase = inner.suggested_break.take().unwrap_or(upcoming);
            inner.load_phase(phase);
        } else {
            let phase = inner.cycle.phase;
            inner.load_phase(phase);
        }
        inner.suggested_break = None;

        let phase = inner.cycle.phase;
        self.shared
            .emit(TimerEvent::phase_changed(phase, inner.cycle.session));
        self.shared.begin(&mut inner);
        tracing::info!("Pomodoro {} started", phase.as_str());
        phase
    }

    /// Skip any break and start the next work session.
    pub async fn start_another(&self) -> u32 {
        let mut inner = self.shared.inner.lock().await;
        inner.halt();
        self.shared.sound.stop();

        let settings = inner.settings.clone();
        if inner.suggested_break.take().is_some() {
            inner.cycle.advance(&settings);
            inner.cycle.advance(&settings);
        } else if inner.cycle.phase.is_break() {
            inner.cycle.advance(&settings);
        }
        inner.load_phase(PomodoroPhase::Work);

        let session = inner.cycle.session;
        self.shared
            .emit(TimerEvent::phase_changed(PomodoroPhase::Work, session));
        self.shared.begin(&mut inner);
        tracing::info!("Pomodoro work session {} started", session);
        session
    }

    pub fn stop_alarm(&self) {
        self.shared.sound.stop();
        self.shared
            .emit(TimerEvent::new(TimerEventType::AlarmStopped, TimerKind::Pomodoro));
    }

    /// Take new phase lengths. An idle, untouched work session at the old
    /// default length moves to the new work duration.
    pub async fn apply_settings(&self, settings: &PomodoroSettings) {
        let mut inner = self.shared.inner.lock().await;
        let old_default = inner.default_minutes;

        inner.settings = settings.clone();
        inner.default_minutes = settings.work_duration;

        let untouched = !inner.state.is_running
            && inner.cycle.phase.is_work()
            && inner.suggested_break.is_none()
            && inner.current_minutes == old_default
            && inner.state.duration_ms == inner.state.total_ms;
        if untouched {
            inner.current_minutes = settings.work_duration;
            inner.load_phase(PomodoroPhase::Work);
        }

        self.shared.persist(&inner);
    }

    pub async fn is_running(&self) -> bool {
        self.shared.inner.lock().await.state.is_running
    }

    pub async fn snapshot(&self) -> PomodoroSnapshot {
        let inner = self.shared.inner.lock().await;
        let remaining_ms = inner.state.current_ms(self.shared.clock.now_ms());

        PomodoroSnapshot {
            is_running: inner.state.is_running,
            remaining_ms,
            display: format_countdown_ms(remaining_ms),
            phase: inner.cycle.phase,
            session: inner.cycle.session,
            sessions_until_long_break: inner.settings.sessions_until_long_break,
            current_minutes: inner.current_minutes,
            default_minutes: inner.default_minutes,
            suggested_break: inner.suggested_break,
            completed: inner.state.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::sound::test_support::RecordingSink;
    use ticktock_core::storage::{keys, KeyValueStore, MemoryStore, SoundStorage};
    use ticktock_core::ManualClock;
    use tokio::time::sleep;

    struct Fixture {
        store: Arc<MemoryStore>,
        sink: Arc<RecordingSink>,
        pomodoro: PomodoroController,
        rx: broadcast::Receiver<TimerEvent>,
    }

    fn fixture_with(store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Fixture {
        let sink = Arc::new(RecordingSink::default());
        let sound = SoundController::new(sink.clone(), SoundStorage::new(store.clone()));
        let (tx, rx) = broadcast::channel(100);
        let pomodoro =
            PomodoroController::new(clock, PomodoroStorage::new(store.clone()), sound, tx);
        Fixture {
            store,
            sink,
            pomodoro,
            rx,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(MemoryStore::new()), Arc::new(TokioClock::new()))
    }

    fn short_settings() -> PomodoroSettings {
        PomodoroSettings {
            work_duration: 1,
            short_break: 1,
            long_break: 3,
            sessions_until_long_break: 2,
        }
    }

    fn drain(rx: &mut broadcast::Receiver<TimerEvent>) -> Vec<TimerEventType> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event.event_type);
        }
        events
    }

    fn count_completions(events: &[TimerEventType]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TimerEventType::PhaseCompleted { .. }))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_defaults_to_25_minutes() {
        let f = fixture();
        let snapshot = f.pomodoro.snapshot().await;
        assert_eq!(snapshot.display, "25:00");
        assert_eq!(snapshot.phase, PomodoroPhase::Work);
        assert_eq!(snapshot.session, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_minutes_zero_uses_default() {
        let f = fixture();
        assert_eq!(f.pomodoro.set_minutes(50).await, 3_000_000);
        assert_eq!(f.pomodoro.snapshot().await.display, "50:00");

        assert_eq!(f.pomodoro.set_minutes(0).await, 1_500_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_durations_persist() {
        let f = fixture();
        f.pomodoro.set_minutes(40).await;

        let raw = f.store.get(keys::POMODORO).unwrap().unwrap();
        assert_eq!(raw, r#"{"defaultDuration":25,"currentDuration":40}"#);

        let reloaded = fixture_with(f.store.clone(), Arc::new(TokioClock::new()));
        assert_eq!(reloaded.pomodoro.snapshot().await.display, "40:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_length_pauses_do_not_drift() {
        let f = fixture();
        f.pomodoro.set_minutes(1).await;
        f.pomodoro.start().await;
        sleep(Duration::from_secs(10)).await;

        for _ in 0..5 {
            f.pomodoro.pause().await;
            f.pomodoro.start().await;
        }
        sleep(Duration::from_secs(10)).await;
        f.pomodoro.pause().await;

        assert_eq!(f.pomodoro.snapshot().await.remaining_ms, 40_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_work_completion_suggests_break_once() {
        let mut f = fixture();
        f.pomodoro.apply_settings(&short_settings()).await;
        f.pomodoro.start().await;

        sleep(Duration::from_secs(65)).await;
        let snapshot = f.pomodoro.snapshot().await;

        assert_eq!(snapshot.remaining_ms, 0);
        assert_eq!(snapshot.display, "00:00");
        assert!(!snapshot.is_running);
        assert!(snapshot.completed);
        assert_eq!(snapshot.suggested_break, Some(PomodoroPhase::ShortBreak));
        assert_eq!(count_completions(&drain(&mut f.rx)), 1);
        assert_eq!(f.sink.last_play(), Some((0.5, true)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_stops_after_ten_seconds() {
        let f = fixture();
        f.pomodoro.apply_settings(&short_settings()).await;
        f.pomodoro.start().await;

        sleep(Duration::from_secs(65)).await;
        assert_eq!(f.sink.stop_count(), 0);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(f.sink.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_break_then_back_to_work() {
        let f = fixture();
        f.pomodoro.apply_settings(&short_settings()).await;
        f.pomodoro.start().await;
        sleep(Duration::from_secs(61)).await;

        assert_eq!(f.pomodoro.start_break().await, PomodoroPhase::ShortBreak);
        let snapshot = f.pomodoro.snapshot().await;
        assert!(snapshot.is_running);
        assert_eq!(snapshot.display, "01:00");

        sleep(Duration::from_secs(61)).await;
        let snapshot = f.pomodoro.snapshot().await;
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.phase, PomodoroPhase::Work);
        assert_eq!(snapshot.session, 2);
        assert_eq!(snapshot.display, "01:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_break_after_last_session() {
        let f = fixture();
        f.pomodoro.apply_settings(&short_settings()).await;

        f.pomodoro.start().await;
        sleep(Duration::from_secs(61)).await;
        assert_eq!(f.pomodoro.start_another().await, 2);

        sleep(Duration::from_secs(61)).await;
        let snapshot = f.pomodoro.snapshot().await;
        assert_eq!(snapshot.suggested_break, Some(PomodoroPhase::LongBreak));

        assert_eq!(f.pomodoro.start_break().await, PomodoroPhase::LongBreak);
        assert_eq!(f.pomodoro.snapshot().await.display, "03:00");

        sleep(Duration::from_secs(181)).await;
        let snapshot = f.pomodoro.snapshot().await;
        assert_eq!(snapshot.phase, PomodoroPhase::Work);
        assert_eq!(snapshot.session, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_can_complete() {
        let clock = Arc::new(ManualClock::new(0));
        let mut f = fixture_with(Arc::new(MemoryStore::new()), clock.clone());
        f.pomodoro.set_minutes(1).await;
        f.pomodoro.start().await;

        clock.advance(90_000);
        assert!(f.pomodoro.pause().await);

        let snapshot = f.pomodoro.snapshot().await;
        assert_eq!(snapshot.remaining_ms, 0);
        assert_eq!(snapshot.suggested_break, Some(PomodoroPhase::ShortBreak));
        assert_eq!(count_completions(&drain(&mut f.rx)), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_phase_and_stops_alarm() {
        let f = fixture();
        f.pomodoro.apply_settings(&short_settings()).await;
        f.pomodoro.start().await;
        sleep(Duration::from_secs(61)).await;

        f.pomodoro.reset().await;
        let snapshot = f.pomodoro.snapshot().await;
        assert_eq!(snapshot.display, "01:00");
        assert_eq!(snapshot.suggested_break, None);
        assert_eq!(f.sink.stop_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_reset_click() {
        let f = fixture();
        assert!(f.pomodoro.start().await);
        assert_eq!(f.sink.last_play(), Some((0.5, false)));

        assert!(!f.pomodoro.start().await);
        assert_eq!(f.sink.play_count(), 1);

        f.pomodoro.reset().await;
        assert_eq!(f.sink.play_count(), 2);
        assert_eq!(f.sink.last_play(), Some((0.5, false)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_settings_keeps_custom_session() {
        let f = fixture();
        f.pomodoro.set_minutes(40).await;
        f.pomodoro.apply_settings(&short_settings()).await;

        let snapshot = f.pomodoro.snapshot().await;
        assert_eq!(snapshot.current_minutes, 40);
        assert_eq!(snapshot.default_minutes, 1);
    }
}
