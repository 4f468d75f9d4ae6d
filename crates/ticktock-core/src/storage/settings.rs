//! Settings persistence, export and import

use super::{keys, KeyValueStore};
use crate::{models::Settings, Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const SETTINGS_EXPORT_FILENAME: &str = "ticktock-settings.json";

/// Overlay `overlay` onto `base` key by key. Nested objects merge
/// recursively; every other value replaces what was there.
pub fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Parse `text` as a settings record and merge it over `base`. The result
/// is validated; on any failure `base` is not touched.
pub fn merge_settings(base: &Settings, text: &str) -> Result<Settings> {
    let overlay: Value = serde_json::from_str(text)?;
    if !overlay.is_object() {
        return Err(Error::InvalidData(
            "Settings must be a JSON object".to_string(),
        ));
    }

    let mut merged = serde_json::to_value(base)?;
    merge_json(&mut merged, overlay);

    let settings: Settings = serde_json::from_value(merged)?;
    settings.validate()?;
    Ok(settings)
}

#[derive(Clone)]
pub struct SettingsStorage {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored settings merged over the defaults. Nothing stored yields the
    /// defaults; a corrupt record is an error.
    pub fn load(&self) -> Result<Settings> {
        match self.store.get(keys::SETTINGS)? {
            Some(raw) if !raw.trim().is_empty() => merge_settings(&Settings::default(), &raw),
            _ => Ok(Settings::default()),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content = serde_json::to_string(settings)?;
        self.store.set(keys::SETTINGS, &content)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::SETTINGS)
    }
}

pub fn export_settings(dir: &Path, settings: &Settings) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(SETTINGS_EXPORT_FILENAME);
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ThemePreference, TimeFormat};
    use crate::storage::MemoryStore;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_merge_json_nested() {
        let mut base = json!({"a": 1, "nested": {"x": 1, "y": 2}});
        merge_json(&mut base, json!({"nested": {"y": 3}, "b": true}));
        assert_eq!(base, json!({"a": 1, "b": true, "nested": {"x": 1, "y": 3}}));
    }

    #[test]
    fn test_load_defaults_when_absent() {
        let storage = SettingsStorage::new(Arc::new(MemoryStore::new()));
        assert_eq!(storage.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_load_partial_record_keeps_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                keys::SETTINGS,
                r#"{"theme":"dark","pomodoro":{"workDuration":50}}"#,
            )
            .unwrap();

        let settings = SettingsStorage::new(store).load().unwrap();
        assert_eq!(settings.theme, ThemePreference::Dark);
        assert_eq!(settings.pomodoro.work_duration, 50);
        assert_eq!(settings.pomodoro.short_break, 5);
        assert_eq!(settings.stopwatch.format, TimeFormat::Hms);
        assert!(settings.notifications);
    }

    #[test]
    fn test_load_corrupt_is_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SETTINGS, "{oops").unwrap();
        assert!(SettingsStorage::new(store).load().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let storage = SettingsStorage::new(Arc::new(MemoryStore::new()));
        let mut settings = Settings::default();
        settings.stopwatch.auto_lap = true;
        settings.stopwatch.format = TimeFormat::Dhms;

        storage.save(&settings).unwrap();
        assert_eq!(storage.load().unwrap(), settings);

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_merge_settings_rejects_bad_input() {
        let base = Settings::default();
        assert!(merge_settings(&base, "not json").is_err());
        assert!(merge_settings(&base, "[1,2]").is_err());
        assert!(merge_settings(&base, r#"{"theme":"purple"}"#).is_err());
        assert!(merge_settings(&base, r#"{"pomodoro":{"workDuration":0}}"#).is_err());
    }

    #[test]
    fn test_export_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = export_settings(temp_dir.path(), &Settings::default()).unwrap();

        assert!(path.ends_with(SETTINGS_EXPORT_FILENAME));
        let content = std::fs::read_to_string(path).unwrap();
        let back = merge_settings(&Settings::default(), &content).unwrap();
        assert_eq!(back, Settings::default());
    }
}
