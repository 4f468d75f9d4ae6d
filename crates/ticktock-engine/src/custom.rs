//! Custom countdown with recent-duration presets

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

use ticktock_core::{
    format::format_countdown_hms,
    models::{hms_to_ms, Advance, CustomTimerSettings, Preset, PresetLedger, TimerState},
    storage::PresetStorage,
    Clock,
};

use crate::error::{Result, TimerError};
use crate::events::{TimerEvent, TimerEventType, TimerKind};
use crate::sound::SoundController;
use crate::ticker::TickHandle;
use crate::DEFAULT_TICK_INTERVAL;

#[derive(Debug, Clone, PartialEq)]
pub struct CustomTimerSnapshot {
    pub is_running: bool,
    pub remaining_ms: u64,
    pub total_ms: u64,
    pub display: String,
    pub alarm_active: bool,
    pub on_break: bool,
    pub presets: Vec<Preset>,
    pub auto_start_break: bool,
    pub break_minutes: u32,
}

struct CustomInner {
    state: TimerState,
    presets: PresetLedger,
    /// Last duration the user set, restored by reset after a break.
    chosen_ms: u64,
    alarm_active: bool,
    on_break: bool,
    auto_start_break: bool,
    break_minutes: u32,
    epoch: u64,
    ticker: Option<TickHandle>,
}

impl CustomInner {
    fn halt(&mut self) {
        self.epoch += 1;
        self.ticker = None;
    }
}

struct Shared {
    inner: Mutex<CustomInner>,
    clock: Arc<dyn Clock>,
    storage: PresetStorage,
    sound: SoundController,
    event_tx: broadcast::Sender<TimerEvent>,
    tick_interval: Duration,
}

impl Shared {
    fn emit(&self, event_type: TimerEventType) {
        let _ = self
            .event_tx
            .send(TimerEvent::new(event_type, TimerKind::Custom));
    }

    fn begin(self: &Arc<Self>, inner: &mut CustomInner) -> bool {
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
        self.emit(TimerEventType::Started);
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

    fn complete(self: &Arc<Self>, inner: &mut CustomInner) {
        inner.alarm_active = true;
        self.sound.play_alarm();
        self.emit(TimerEventType::CountdownCompleted);
        tracing::info!(
            "Custom timer finished{}",
            if inner.on_break { " (break)" } else { "" }
        );

        if inner.auto_start_break && !inner.on_break {
            inner.on_break = true;
            inner.state.set_total(hms_to_ms(0, inner.break_minutes, 0));
            if self.begin(inner) {
                tracing::info!("Break of {} minutes started", inner.break_minutes);
            }
        }
    }
}

/// Countdown the user sets to any length. Cheap to clone; clones share
/// state.
#[derive(Clone)]
pub struct CustomTimerController {
    shared: Arc<Shared>,
}

impl CustomTimerController {
    pub fn new(
        clock: Arc<dyn Clock>,
        storage: PresetStorage,
        sound: SoundController,
        event_tx: broadcast::Sender<TimerEvent>,
    ) -> Self {
        let presets = storage.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load presets, starting empty: {}", e);
            PresetLedger::new()
        });
        let defaults = CustomTimerSettings::default();

        let inner = CustomInner {
            state: TimerState::new_countdown(),
            presets,
            chosen_ms: 0,
            alarm_active: false,
            on_break: false,
            auto_start_break: defaults.auto_start_break,
            break_minutes: defaults.default_break_duration,
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

    fn silence(&self, inner: &mut CustomInner) {
        if inner.alarm_active {
            inner.alarm_active = false;
            self.shared.sound.stop();
            self.shared.emit(TimerEventType::AlarmStopped);
        }
    }

    /// Load a new duration, paused, and remember it as a preset. An
    /// all-zero duration is rejected and nothing changes.
    pub async fn set_time(&self, hours: u32, minutes: u32, seconds: u32) -> Result<u64> {
        let total_ms = hms_to_ms(hours, minutes, seconds);
        if total_ms == 0 {
            return Err(TimerError::Core(ticktock_core::Error::Validation(
                "Please enter a time greater than 0".to_string(),
            )));
        }

        let mut inner = self.shared.inner.lock().await;
        inner.halt();
        self.silence(&mut inner);
        inner.on_break = false;
        inner.chosen_ms = total_ms;
        inner.state.set_total(total_ms);

        if inner.presets.record(hours, minutes, seconds) {
            if let Err(e) = self.shared.storage.save(&inner.presets) {
                tracing::warn!("Failed to save presets: {}", e);
            }
        }

        self.shared.emit(TimerEventType::DurationSet { total_ms });
        tracing::info!("Custom timer set to {}h {}m {}s", hours, minutes, seconds);
        Ok(total_ms)
    }

    /// Load the preset at `index` (0 = newest).
    pub async fn select_preset(&self, index: usize) -> Result<u64> {
        let preset = {
            let inner = self.shared.inner.lock().await;
            inner.presets.get(index).cloned()
        };
        let preset = preset.ok_or_else(|| {
            TimerError::Core(ticktock_core::Error::Validation(format!(
                "No preset at position {}",
                index
            )))
        })?;

        self.set_time(preset.hours, preset.minutes, preset.seconds)
            .await
    }

    /// Returns `false` when running already or when nothing is left.
    pub async fn start(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        self.shared.begin(&mut inner)
    }

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
            self.shared.emit(TimerEventType::Paused {
                duration_ms: inner.state.duration_ms,
            });
        }
        true
    }

    /// Start or pause. Fails when no duration was ever set.
    pub async fn toggle(&self) -> Result<bool> {
        let running = {
            let inner = self.shared.inner.lock().await;
            if inner.state.total_ms == 0 {
                return Err(TimerError::NoDurationSet);
            }
            inner.state.is_running
        };

        if running {
            self.pause().await;
            Ok(false)
        } else {
            Ok(self.start().await)
        }
    }

    /// Stop, silence the alarm and restore the last chosen duration.
    pub async fn reset(&self) {
        let mut inner = self.shared.inner.lock().await;
        inner.halt();
        self.silence(&mut inner);

        if inner.on_break {
            inner.on_break = false;
            let chosen = inner.chosen_ms;
            inner.state.set_total(chosen);
        } else {
            inner.state.reset();
        }

        self.shared.emit(TimerEventType::Reset);
    }

    pub async fn stop_alarm(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        let was_active = inner.alarm_active;
        self.silence(&mut inner);
        was_active
    }

    pub async fn apply_settings(&self, settings: &CustomTimerSettings) {
        let mut inner = self.shared.inner.lock().await;
        inner.auto_start_break = settings.auto_start_break;
        inner.break_minutes = settings.default_break_duration;
    }

    pub async fn is_running(&self) -> bool {
        self.shared.inner.lock().await.state.is_running
    }

    pub async fn alarm_active(&self) -> bool {
        self.shared.inner.lock().await.alarm_active
    }

    pub async fn presets(&self) -> Vec<Preset> {
        self.shared.inner.lock().await.presets.presets().to_vec()
    }

    pub async fn snapshot(&self) -> CustomTimerSnapshot {
        let inner = self.shared.inner.lock().await;
        let remaining_ms = inner.state.current_ms(self.shared.clock.now_ms());

        CustomTimerSnapshot {
            is_running: inner.state.is_running,
            remaining_ms,
            total_ms: inner.state.total_ms,
            display: format_countdown_hms(remaining_ms),
            alarm_active: inner.alarm_active,
            on_break: inner.on_break,
            presets: inner.presets.presets().to_vec(),
            auto_start_break: inner.auto_start_break,
            break_minutes: inner.break_minutes,
        }
    }
}
