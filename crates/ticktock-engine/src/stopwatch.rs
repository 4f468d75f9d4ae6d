//! Stopwatch controller with lap ledger

use chrono::{Local, Utc};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

use ticktock_core::{
    format::format_stopwatch,
    models::{Advance, Lap, LapLedger, PendingLapAction, TimeFormat, TimerState},
    storage::{export_laps, LapStorage},
    Clock,
};

use crate::error::{Result, TimerError};
use crate::events::{TimerEvent, TimerEventType, TimerKind};
use crate::sound::SoundController;
use crate::ticker::TickHandle;
use crate::DEFAULT_TICK_INTERVAL;

const MINUTE_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq)]
pub struct StopwatchSnapshot {
    pub is_running: bool,
    pub elapsed_ms: u64,
    pub display: String,
    pub format: TimeFormat,
    pub auto_lap: bool,
    /// Newest first.
    pub laps: Vec<Lap>,
    pub pending: Option<PendingLapAction>,
}

struct StopwatchInner {
    state: TimerState,
    ledger: LapLedger,
    auto_lap: bool,
    format: TimeFormat,
    /// Whole minutes already covered by an automatic lap.
    auto_lap_minute: u64,
    epoch: u64,
    ticker: Option<TickHandle>,
}

impl StopwatchInner {
    /// Invalidate the running tick loop.
    fn halt(&mut self) {
        self.epoch += 1;
        self.ticker = None;
    }
}

struct Shared {
    inner: Mutex<StopwatchInner>,
    clock: Arc<dyn Clock>,
    storage: LapStorage,
    sound: SoundController,
    event_tx: broadcast::Sender<TimerEvent>,
    tick_interval: Duration,
}

impl Shared {
    fn emit(&self, event_type: TimerEventType) {
        let _ = self
            .event_tx
            .send(TimerEvent::new(event_type, TimerKind::Stopwatch));
    }

    fn persist(&self, ledger: &LapLedger) {
        if let Err(e) = self.storage.save(ledger) {
            tracing::warn!("Failed to save laps: {}", e);
        }
    }

    fn record_lap(&self, inner: &mut StopwatchInner, total_ms: u64) -> Lap {
        let lap = inner.ledger.record(total_ms, Utc::now()).clone();
        self.persist(&inner.ledger);
        self.sound.play();
        self.emit(TimerEventType::LapRecorded {
            number: lap.number,
            total_ms: lap.total_ms,
            lap_ms: lap.lap_ms,
        });
        lap
    }

    fn spawn_ticker(self: &Arc<Self>, epoch: u64) -> TickHandle {
        TickHandle::spawn_for(self, self.tick_interval, move |shared| async move {
            shared.tick(epoch).await
        })
    }

    async fn tick(&self, epoch: u64) -> ControlFlow<()> {
        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch || !inner.state.is_running {
            return ControlFlow::Break(());
        }

        let now = self.clock.now_ms();
        if let Advance::Running(total_ms) = inner.state.sample(now) {
            let minute = total_ms / MINUTE_MS;
            if inner.auto_lap && minute > inner.auto_lap_minute {
                inner.auto_lap_minute = minute;
                let lap = self.record_lap(&mut inner, total_ms);
                tracing::debug!("Auto lap {} at {}ms", lap.number, total_ms);
            }
        }

        ControlFlow::Continue(())
    }
}

/// Count-up timer. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct StopwatchController {
    shared: Arc<Shared>,
}

impl StopwatchController {
    pub fn new(
        clock: Arc<dyn Clock>,
        storage: LapStorage,
        sound: SoundController,
        event_tx: broadcast::Sender<TimerEvent>,
    ) -> Self {
        let ledger = storage.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load laps, starting empty: {}", e);
            LapLedger::new()
        });

        let inner = StopwatchInner {
            state: TimerState::new_stopwatch(),
            ledger,
            auto_lap: false,
            format: TimeFormat::Hms,
            auto_lap_minute: 0,
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

    pub async fn start(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        let now = self.shared.clock.now_ms();
        if !inner.state.start(now) {
            return false;
        }

        inner.auto_lap_minute = inner.state.duration_ms / MINUTE_MS;
        inner.epoch += 1;
        let epoch = inner.epoch;
        inner.ticker = Some(self.shared.spawn_ticker(epoch));
        self.shared.sound.play();

        self.shared.emit(TimerEventType::Started);
        tracing::info!("Stopwatch started at {}ms", inner.state.duration_ms);
        true
    }

    pub async fn pause(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        if !inner.state.is_running {
            return false;
        }

        let now = self.shared.clock.now_ms();
        inner.state.pause(now);
        inner.halt();

        let elapsed = inner.state.duration_ms;
        self.shared.emit(TimerEventType::Paused {
            duration_ms: elapsed,
        });
        tracing::info!("Stopwatch paused at {}ms", elapsed);
        true
    }

    /// Start when paused, pause when running. Returns whether the
    /// stopwatch is running afterwards.
    pub async fn toggle(&self) -> bool {
        if self.is_running().await {
            self.pause().await;
            false
        } else {
            self.start().await
        }
    }

    /// Stop and zero the stopwatch. When laps exist a clear-all request is
    /// left pending; returns whether one was made.
    pub async fn reset(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        inner.halt();
        inner.state.reset();
        inner.auto_lap_minute = 0;
        let clear_requested = inner.ledger.request_clear();
        self.shared.sound.play();

        self.shared.emit(TimerEventType::Reset);
        tracing::info!("Stopwatch reset");
        clear_requested
    }

    /// Capture a lap. Only possible while running.
    pub async fn add_lap(&self) -> Option<Lap> {
        let mut inner = self.shared.inner.lock().await;
        if !inner.state.is_running {
            return None;
        }

        let total_ms = inner.state.current_ms(self.shared.clock.now_ms());
        Some(self.shared.record_lap(&mut inner, total_ms))
    }

    /// Ask to delete the lap shown at `display_pos` (0 = newest).
    pub async fn request_delete(&self, display_pos: usize) -> Result<Lap> {
        let mut inner = self.shared.inner.lock().await;
        let index = inner.ledger.storage_index(display_pos).ok_or_else(|| {
            TimerError::Core(ticktock_core::Error::Validation(format!(
                "No lap at position {}",
                display_pos
            )))
        })?;

        let lap = inner.ledger.request_delete(index)?.clone();
        Ok(lap)
    }

    pub async fn request_clear(&self) -> bool {
        let mut inner = self.shared.inner.lock().await;
        inner.ledger.request_clear()
    }

    pub async fn pending(&self) -> Option<PendingLapAction> {
        self.shared.inner.lock().await.ledger.pending()
    }

    pub async fn cancel(&self) -> Option<PendingLapAction> {
        self.shared.inner.lock().await.ledger.cancel_pending()
    }

    /// Apply the pending delete or clear.
    pub async fn confirm(&self) -> Result<PendingLapAction> {
        let mut inner = self.shared.inner.lock().await;
        if inner.ledger.pending().is_none() {
            return Err(TimerError::NothingPending);
        }

        let action = inner.ledger.confirm_pending()?;
        self.shared.persist(&inner.ledger);

        match action {
            PendingLapAction::Delete { number, .. } => {
                self.shared.emit(TimerEventType::LapDeleted { number });
                tracing::info!("Deleted lap {}", number);
            }
            PendingLapAction::ClearAll => {
                self.shared.sound.play();
                self.shared.emit(TimerEventType::LapsCleared);
                tracing::info!("Cleared all laps");
            }
        }

        Ok(action)
    }

    /// Write the laps to a dated CSV file in `dir`.
    pub async fn export_laps(&self, dir: &Path) -> Result<PathBuf> {
        let laps = {
            let inner = self.shared.inner.lock().await;
            inner.ledger.laps().to_vec()
        };
        if laps.is_empty() {
            return Err(TimerError::NoLaps);
        }

        let path = export_laps(dir, &laps, Local::now().date_naive())?;
        tracing::info!("Exported {} laps to {}", laps.len(), path.display());
        Ok(path)
    }

    pub async fn set_auto_lap(&self, enabled: bool) {
        let mut inner = self.shared.inner.lock().await;
        inner.auto_lap = enabled;
        if enabled {
            let now = self.shared.clock.now_ms();
            inner.auto_lap_minute = inner.state.current_ms(now) / MINUTE_MS;
        }
    }

    pub async fn set_format(&self, format: TimeFormat) {
        self.shared.inner.lock().await.format = format;
    }

    pub async fn is_running(&self) -> bool {
        self.shared.inner.lock().await.state.is_running
    }

    pub async fn elapsed_ms(&self) -> u64 {
        let inner = self.shared.inner.lock().await;
        inner.state.current_ms(self.shared.clock.now_ms())
    }

    pub async fn snapshot(&self) -> StopwatchSnapshot {
        let inner = self.shared.inner.lock().await;
        let elapsed_ms = inner.state.current_ms(self.shared.clock.now_ms());

        StopwatchSnapshot {
            is_running: inner.state.is_running,
            elapsed_ms,
            display: format_stopwatch(elapsed_ms, inner.format),
            format: inner.format,
            auto_lap: inner.auto_lap,
            laps: inner.ledger.display_order().cloned().collect(),
            pending: inner.ledger.pending(),
        }
    }
}
