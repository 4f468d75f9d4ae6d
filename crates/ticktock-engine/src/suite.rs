//! Composition root wiring every controller to one store, clock and sink

use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

use ticktock_core::{
    models::{Settings, ThemePreference},
    storage::{
        KeyValueStore, LapStorage, PomodoroStorage, PresetStorage, SettingsStorage, SoundStorage,
        ThemeStorage,
    },
    Clock,
};

use crate::custom::CustomTimerController;
use crate::error::SettingsError;
use crate::events::TimerEvent;
use crate::pomodoro::PomodoroController;
use crate::settings::SettingsManager;
use crate::sound::{AudioSink, SoundController};
use crate::stopwatch::StopwatchController;
use crate::theme::ThemeController;

const EVENT_CAPACITY: usize = 1000;

/// Every controller of the application, built once and handed to the
/// front-end.
pub struct TimerSuite {
    pub stopwatch: StopwatchController,
    pub pomodoro: PomodoroController,
    pub custom: CustomTimerController,
    pub sound: SoundController,
    pub theme: ThemeController,
    pub settings: SettingsManager,
    event_tx: broadcast::Sender<TimerEvent>,
}

impl TimerSuite {
    /// Build the suite and apply the stored settings to it.
    pub async fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn AudioSink>,
        system_dark: bool,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let sound = SoundController::new(sink, SoundStorage::new(store.clone()));
        let theme = ThemeController::new(ThemeStorage::new(store.clone()), system_dark);
        let settings = SettingsManager::new(SettingsStorage::new(store.clone()));

        let stopwatch = StopwatchController::new(
            clock.clone(),
            LapStorage::new(store.clone()),
            sound.clone(),
            event_tx.clone(),
        );
        let pomodoro = PomodoroController::new(
            clock.clone(),
            PomodoroStorage::new(store.clone()),
            sound.clone(),
            event_tx.clone(),
        );
        let custom = CustomTimerController::new(
            clock,
            PresetStorage::new(store),
            sound.clone(),
            event_tx.clone(),
        );

        let suite = Self {
            stopwatch,
            pomodoro,
            custom,
            sound,
            theme,
            settings,
            event_tx,
        };

        let current = suite.settings.get().await;
        suite.apply_settings(&current).await;
        tracing::info!("Timer suite ready");
        suite
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Push `settings` into the controllers. A `system` theme preference
    /// leaves any explicit theme choice in place.
    pub async fn apply_settings(&self, settings: &Settings) {
        if settings.theme != ThemePreference::System {
            self.theme.apply_preference(settings.theme);
        }

        self.pomodoro.apply_settings(&settings.pomodoro).await;
        self.custom.apply_settings(&settings.custom_timer).await;
        self.stopwatch.set_auto_lap(settings.stopwatch.auto_lap).await;
        self.stopwatch.set_format(settings.stopwatch.format).await;
    }

    async fn switch_to(&self, previous: &Settings, next: Settings) -> Settings {
        if next.theme == ThemePreference::System && previous.theme != ThemePreference::System {
            self.theme.apply_preference(ThemePreference::System);
        }
        self.apply_settings(&next).await;
        next
    }

    pub async fn update_settings(&self, settings: Settings) -> Result<Settings, SettingsError> {
        let previous = self.settings.get().await;
        let saved = self.settings.update(settings).await?;
        Ok(self.switch_to(&previous, saved).await)
    }

    pub async fn import_settings(&self, text: &str) -> Result<Settings, SettingsError> {
        let previous = self.settings.get().await;
        let imported = self.settings.import_json(text).await?;
        Ok(self.switch_to(&previous, imported).await)
    }

    pub async fn import_settings_from(&self, path: &Path) -> Result<Settings, SettingsError> {
        let previous = self.settings.get().await;
        let imported = self.settings.import_from(path).await?;
        Ok(self.switch_to(&previous, imported).await)
    }

    pub async fn reset_settings(&self) -> Result<Settings, SettingsError> {
        let previous = self.settings.get().await;
        let defaults = self.settings.reset_to_default().await?;
        Ok(self.switch_to(&previous, defaults).await)
    }

    /// Stop every running timer.
    pub async fn shutdown(&self) {
        self.stopwatch.pause().await;
        self.pomodoro.pause().await;
        self.custom.pause().await;
        self.sound.stop();
        tracing::info!("Timer suite stopped");
    }
}
