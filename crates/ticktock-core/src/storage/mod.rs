pub mod export;
pub mod kv;
pub mod laps;
pub mod prefs;
pub mod presets;
pub mod settings;

pub use export::{export_laps, lap_export_filename, write_laps_csv, LAP_CSV_HEADER};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use laps::LapStorage;
pub use prefs::{PomodoroDurations, PomodoroStorage, SoundPrefs, SoundStorage, ThemeStorage};
pub use presets::PresetStorage;
pub use settings::{
    export_settings, merge_json, merge_settings, SettingsStorage, SETTINGS_EXPORT_FILENAME,
};

use std::path::PathBuf;

/// Keys used in the key-value store.
pub mod keys {
    pub const LAPS: &str = "stopwatch-laps";
    pub const LAP_COUNTER: &str = "stopwatch-lap-counter";
    pub const PRESETS: &str = "custom-timer-presets";
    pub const POMODORO: &str = "pomodoro-settings";
    pub const SOUND_ENABLED: &str = "soundEnabled";
    pub const SOUND_VOLUME: &str = "soundVolume";
    pub const DARK_MODE: &str = "darkmode";
    pub const SETTINGS: &str = "app-settings";
}

pub const STORE_FILENAME: &str = "store.json";

pub fn get_data_dir() -> crate::Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("ticktock"))
        .ok_or_else(|| crate::Error::Storage("Could not find data directory".to_string()))
}

pub fn init_data_dir(override_dir: Option<PathBuf>) -> crate::Result<PathBuf> {
    let data_dir = match override_dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}
