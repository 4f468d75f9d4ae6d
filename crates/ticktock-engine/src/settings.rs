//! Settings manager

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use ticktock_core::{
    models::{Settings, ThemePreference, TimeFormat},
    storage::{export_settings, merge_settings, SettingsStorage},
};

use crate::error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Owns the merged settings record. Changes only land through an explicit
/// save.
pub struct SettingsManager {
    storage: SettingsStorage,
    settings: Arc<RwLock<Settings>>,
}

impl SettingsManager {
    /// Load stored settings over the defaults. A corrupt record falls back
    /// to the defaults.
    pub fn new(storage: SettingsStorage) -> Self {
        let settings = storage.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        });

        Self {
            storage,
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    pub async fn update(&self, settings: Settings) -> Result<Settings> {
        settings
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;

        self.storage.save(&settings)?;

        {
            let mut current = self.settings.write().await;
            *current = settings.clone();
        }

        tracing::info!("Settings saved");
        Ok(settings)
    }

    pub async fn reset_to_default(&self) -> Result<Settings> {
        self.storage.clear()?;

        let defaults = Settings::default();
        {
            let mut current = self.settings.write().await;
            *current = defaults.clone();
        }

        tracing::info!("Settings reset to defaults");
        Ok(defaults)
    }

    pub async fn export_json(&self) -> Result<String> {
        let settings = self.get().await;
        serde_json::to_string_pretty(&settings)
            .map_err(|e| SettingsError::Storage(ticktock_core::Error::Json(e)))
    }

    /// Write the current settings into `dir`.
    pub async fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let settings = self.get().await;
        let path = export_settings(dir, &settings)?;
        tracing::info!("Exported settings to {}", path.display());
        Ok(path)
    }

    /// Merge `text` over the current settings and save. Any failure leaves
    /// the current settings untouched.
    pub async fn import_json(&self, text: &str) -> Result<Settings> {
        let current = self.get().await;
        let merged = merge_settings(&current, text).map_err(|e| {
            tracing::warn!("Rejected settings import: {}", e);
            SettingsError::Import(e.to_string())
        })?;

        self.update(merged).await
    }

    pub async fn import_from(&self, path: &Path) -> Result<Settings> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::Import(format!("{}: {}", path.display(), e)))?;
        self.import_json(&text).await
    }

    pub async fn set_theme(&self, theme: ThemePreference) -> Result<Settings> {
        let mut settings = self.get().await;
        settings.theme = theme;
        self.update(settings).await
    }

    pub async fn set_notifications(&self, enabled: bool) -> Result<Settings> {
        let mut settings = self.get().await;
        settings.notifications = enabled;
        self.update(settings).await
    }

    pub async fn set_keep_screen_awake(&self, enabled: bool) -> Result<Settings> {
        let mut settings = self.get().await;
        settings.keep_screen_awake = enabled;
        self.update(settings).await
    }

    pub async fn update_pomodoro(
        &self,
        work_duration: Option<u32>,
        short_break: Option<u32>,
        long_break: Option<u32>,
        sessions_until_long_break: Option<u32>,
    ) -> Result<Settings> {
        let mut settings = self.get().await;

        if let Some(minutes) = work_duration {
            settings.pomodoro.work_duration = minutes;
        }

        if let Some(minutes) = short_break {
            settings.pomodoro.short_break = minutes;
        }

        if let Some(minutes) = long_break {
            settings.pomodoro.long_break = minutes;
        }

        if let Some(sessions) = sessions_until_long_break {
            settings.pomodoro.sessions_until_long_break = sessions;
        }

        self.update(settings).await
    }

    pub async fn update_custom_timer(
        &self,
        auto_start_break: Option<bool>,
        default_break_duration: Option<u32>,
    ) -> Result<Settings> {
        let mut settings = self.get().await;

        if let Some(enabled) = auto_start_break {
            settings.custom_timer.auto_start_break = enabled;
        }

        if let Some(minutes) = default_break_duration {
            settings.custom_timer.default_break_duration = minutes;
        }

        self.update(settings).await
    }

    pub async fn update_stopwatch(
        &self,
        auto_lap: Option<bool>,
        format: Option<TimeFormat>,
    ) -> Result<Settings> {
        let mut settings = self.get().await;

        if let Some(enabled) = auto_lap {
            settings.stopwatch.auto_lap = enabled;
        }

        if let Some(format) = format {
            settings.stopwatch.format = format;
        }

        self.update(settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use ticktock_core::storage::{keys, KeyValueStore, MemoryStore};

    fn manager() -> (Arc<MemoryStore>, SettingsManager) {
        let store = Arc::new(MemoryStore::new());
        let manager = SettingsManager::new(SettingsStorage::new(store.clone()));
        (store, manager)
    }

    #[tokio::test]
    async fn test_corrupt_storage_falls_back() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SETTINGS, "{\"theme\": 42").unwrap();

        let manager = SettingsManager::new(SettingsStorage::new(store));
        assert_eq!(manager.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_update_validates() {
        let (store, manager) = manager();

        let result = manager.update_pomodoro(Some(90), None, None, None).await;
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
        assert_eq!(manager.get().await, Settings::default());
        assert_eq!(store.get(keys::SETTINGS).unwrap(), None);

        let updated = manager
            .update_pomodoro(Some(50), Some(10), None, Some(6))
            .await
            .unwrap();
        assert_eq!(updated.pomodoro.work_duration, 50);
        assert_eq!(updated.pomodoro.sessions_until_long_break, 6);
        assert!(store.get(keys::SETTINGS).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_persisted_across_instances() {
        let (store, manager) = manager();
        manager
            .update_stopwatch(Some(true), Some(TimeFormat::Dhms))
            .await
            .unwrap();

        let reloaded = SettingsManager::new(SettingsStorage::new(store));
        let settings = reloaded.get().await;
        assert!(settings.stopwatch.auto_lap);
        assert_eq!(settings.stopwatch.format, TimeFormat::Dhms);
    }

    #[tokio::test]
    async fn test_malformed_import_changes_nothing() {
        let (_, manager) = manager();
        manager.set_theme(ThemePreference::Dark).await.unwrap();
        let before = manager.get().await;

        for bad in [
            "{not json",
            "[]",
            r#"{"theme":"dark","pomodoro":{"workDuration":"long"}}"#,
            r#"{"notifications":false,"pomodoro":{"workDuration":0}}"#,
        ] {
            let result = manager.import_json(bad).await;
            assert!(matches!(result, Err(SettingsError::Import(_))), "{}", bad);
            assert_eq!(manager.get().await, before);
        }
    }

    #[tokio::test]
    async fn test_import_merges() {
        let (_, manager) = manager();
        let imported = manager
            .import_json(r#"{"notifications":false,"customTimer":{"autoStartBreak":true}}"#)
            .await
            .unwrap();

        assert!(!imported.notifications);
        assert!(imported.custom_timer.auto_start_break);
        assert_eq!(imported.custom_timer.default_break_duration, 5);
        assert_eq!(manager.get().await, imported);
    }

    #[tokio::test]
    async fn test_export_and_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let (_, manager) = manager();
        manager.set_keep_screen_awake(true).await.unwrap();

        let path = manager.export_to(temp_dir.path()).await.unwrap();
        assert!(manager.export_json().await.unwrap().contains("keepScreenAwake"));

        let (_, other) = self::manager();
        let imported = other.import_from(&path).await.unwrap();
        assert!(imported.keep_screen_awake);

        let missing = other.import_from(&temp_dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(SettingsError::Import(_))));
    }

    #[tokio::test]
    async fn test_reset_to_default() {
        let (store, manager) = manager();
        manager.set_notifications(false).await.unwrap();

        assert_eq!(manager.reset_to_default().await.unwrap(), Settings::default());
        assert_eq!(store.get(keys::SETTINGS).unwrap(), None);
    }
}
