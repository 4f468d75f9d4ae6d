use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("No timer duration set")]
    NoDurationSet,

    #[error("No laps to export")]
    NoLaps,

    #[error("Nothing awaiting confirmation")]
    NothingPending,

    #[error("{0}")]
    Core(#[from] ticktock_core::Error),
}

pub type Result<T> = std::result::Result<T, TimerError>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    Storage(#[from] ticktock_core::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Import failed: {0}")]
    Import(String),
}
