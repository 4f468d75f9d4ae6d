//! Shared sound controller

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use ticktock_core::storage::{SoundPrefs, SoundStorage};

#[derive(Debug, Error)]
#[error("Playback failed: {0}")]
pub struct PlaybackError(pub String);

/// Something that can make the alert sound.
pub trait AudioSink: Send + Sync {
    /// Start the sound from the beginning.
    fn play(&self, volume: f32, looped: bool) -> Result<(), PlaybackError>;
    fn stop(&self);
}

/// Sink that never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&self, _volume: f32, _looped: bool) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn stop(&self) {}
}

#[derive(Debug)]
struct SoundState {
    enabled: bool,
    volume: f32,
    /// Bumped on every play and stop so a delayed stop can tell whether
    /// the sound it meant to end is still the current one.
    generation: u64,
}

/// Cloneable handle to the single audio output.
#[derive(Clone)]
pub struct SoundController {
    sink: Arc<dyn AudioSink>,
    storage: SoundStorage,
    state: Arc<Mutex<SoundState>>,
}

impl SoundController {
    pub fn new(sink: Arc<dyn AudioSink>, storage: SoundStorage) -> Self {
        let prefs = storage.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load sound preferences, using defaults: {}", e);
            SoundPrefs::default()
        });

        Self {
            sink,
            storage,
            state: Arc::new(Mutex::new(SoundState {
                enabled: prefs.enabled,
                volume: prefs.volume,
                generation: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SoundState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    pub fn volume(&self) -> f32 {
        self.state().volume
    }

    /// Play the alert once. Does nothing while sound is disabled.
    pub fn play(&self) {
        self.start(false);
    }

    /// Play the alert on repeat until stopped. Returns the playback
    /// generation for [`SoundController::stop_if_current`].
    pub fn play_alarm(&self) -> u64 {
        self.start(true)
    }

    fn start(&self, looped: bool) -> u64 {
        let mut state = self.state();
        if !state.enabled {
            return state.generation;
        }

        state.generation += 1;
        if let Err(e) = self.sink.play(state.volume, looped) {
            tracing::debug!("Ignoring playback failure: {}", e);
        }
        state.generation
    }

    pub fn stop(&self) {
        let mut state = self.state();
        state.generation += 1;
        self.sink.stop();
    }

    /// Stop only if nothing was played or stopped since `generation`.
    pub fn stop_if_current(&self, generation: u64) -> bool {
        let mut state = self.state();
        if state.generation != generation {
            return false;
        }
        state.generation += 1;
        self.sink.stop();
        true
    }

    /// Schedule [`SoundController::stop_if_current`] after `delay`.
    pub fn stop_after(&self, generation: u64, delay: Duration) {
        let sound = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sound.stop_if_current(generation) {
                tracing::debug!("Alarm auto-stopped after {:?}", delay);
            }
        });
    }

    /// Flip the enabled flag and persist it. Turning sound off stops any
    /// playback; turning it on plays nothing.
    pub fn toggle(&self) -> bool {
        let enabled = {
            let mut state = self.state();
            state.enabled = !state.enabled;
            state.enabled
        };

        if let Err(e) = self.storage.save_enabled(enabled) {
            tracing::warn!("Failed to save sound setting: {}", e);
        }
        if !enabled {
            self.stop();
        }

        tracing::info!("Sound {}", if enabled { "enabled" } else { "muted" });
        enabled
    }

    /// Set and persist the volume, clamped to `0.0..=1.0`. Non-finite input
    /// is ignored.
    pub fn set_volume(&self, volume: f32) -> f32 {
        let volume = {
            let mut state = self.state();
            if volume.is_finite() {
                state.volume = volume.clamp(0.0, 1.0);
            }
            state.volume
        };

        if let Err(e) = self.storage.save_volume(volume) {
            tracing::warn!("Failed to save volume: {}", e);
        }
        volume
    }

    pub fn adjust_volume(&self, delta: f32) -> f32 {
        let current = self.volume();
        self.set_volume(current + delta)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;
    use ticktock_core::storage::{keys, KeyValueStore, MemoryStore};

    fn controller() -> (Arc<MemoryStore>, Arc<RecordingSink>, SoundController) {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());
        let sound = SoundController::new(sink.clone(), SoundStorage::new(store.clone()));
        (store, sink, sound)
    }

    #[test]
    fn test_defaults() {
        let (_, _, sound) = controller();
        assert!(sound.is_enabled());
        assert_eq!(sound.volume(), 0.5);
    }

    #[test]
    fn test_play_respects_enabled() {
        let (_, sink, sound) = controller();
        sound.play();
        assert_eq!(sink.last_play(), Some((0.5, false)));

        sound.toggle();
        sound.play();
        sound.play_alarm();
        assert_eq!(sink.play_count(), 1);
    }

    #[test]
    fn test_playback_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let sound = SoundController::new(sink.clone(), SoundStorage::new(store));

        sound.play_alarm();
        assert_eq!(sink.last_play(), Some((0.5, true)));
    }

    #[test]
    fn test_toggle_persists_and_does_not_resume() {
        let (store, sink, sound) = controller();

        assert!(!sound.toggle());
        assert_eq!(store.get(keys::SOUND_ENABLED).unwrap(), Some("false".into()));
        assert_eq!(sink.stop_count(), 1);

        assert!(sound.toggle());
        assert_eq!(store.get(keys::SOUND_ENABLED).unwrap(), Some("true".into()));
        assert_eq!(sink.play_count(), 0);
    }

    #[test]
    fn test_volume_clamped() {
        let (store, _, sound) = controller();
        assert_eq!(sound.set_volume(1.7), 1.0);
        assert_eq!(sound.adjust_volume(-0.25), 0.75);
        assert_eq!(sound.set_volume(f32::NAN), 0.75);
        assert_eq!(sound.set_volume(-3.0), 0.0);
        assert_eq!(store.get(keys::SOUND_VOLUME).unwrap(), Some("0".into()));
    }

    #[test]
    fn test_loads_saved_prefs() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SOUND_ENABLED, "false").unwrap();
        store.set(keys::SOUND_VOLUME, "0.3").unwrap();

        let sound = SoundController::new(Arc::new(SilentSink), SoundStorage::new(store));
        assert!(!sound.is_enabled());
        assert!((sound.volume() - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_skips_superseded_alarm() {
        let (_, sink, sound) = controller();

        let first = sound.play_alarm();
        sound.stop_after(first, Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(5)).await;

        let second = sound.play_alarm();
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(sink.stop_count(), 0);

        sound.stop_after(second, Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(sink.stop_count(), 1);
    }
}
