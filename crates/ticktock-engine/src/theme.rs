//! Light/dark theme selection

use std::sync::{Mutex, MutexGuard, PoisonError};
use ticktock_core::models::{Palette, Theme, ThemePreference};
use ticktock_core::storage::ThemeStorage;

#[derive(Debug)]
struct ThemeState {
    theme: Theme,
    /// The user picked a theme explicitly; system changes are ignored.
    explicit: bool,
    system_dark: bool,
}

pub struct ThemeController {
    storage: ThemeStorage,
    state: Mutex<ThemeState>,
}

fn system_theme(dark: bool) -> Theme {
    if dark {
        Theme::Dark
    } else {
        Theme::Light
    }
}

impl ThemeController {
    /// A stored choice wins over the system preference.
    pub fn new(storage: ThemeStorage, system_dark: bool) -> Self {
        let stored = storage.load_dark_mode().unwrap_or_else(|e| {
            tracing::warn!("Failed to load theme, following system: {}", e);
            None
        });

        let state = match stored {
            Some(dark) => ThemeState {
                theme: system_theme(dark),
                explicit: true,
                system_dark,
            },
            None => ThemeState {
                theme: system_theme(system_dark),
                explicit: false,
                system_dark,
            },
        };

        Self {
            storage,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, ThemeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn theme(&self) -> Theme {
        self.state().theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme().is_dark()
    }

    pub fn palette(&self) -> &'static Palette {
        self.theme().palette()
    }

    pub fn is_explicit(&self) -> bool {
        self.state().explicit
    }

    fn choose(&self, theme: Theme) -> Theme {
        {
            let mut state = self.state();
            state.theme = theme;
            state.explicit = true;
        }
        if let Err(e) = self.storage.save_dark_mode(theme.is_dark()) {
            tracing::warn!("Failed to save theme: {}", e);
        }
        theme
    }

    /// Switch to the other palette and remember the choice.
    pub fn toggle(&self) -> Theme {
        let next = self.theme().toggled();
        self.choose(next)
    }

    pub fn apply_preference(&self, preference: ThemePreference) -> Theme {
        match preference {
            ThemePreference::Light => self.choose(Theme::Light),
            ThemePreference::Dark => self.choose(Theme::Dark),
            ThemePreference::System => {
                if let Err(e) = self.storage.clear() {
                    tracing::warn!("Failed to clear theme choice: {}", e);
                }
                let mut state = self.state();
                state.explicit = false;
                state.theme = system_theme(state.system_dark);
                state.theme
            }
        }
    }

    /// Record a system appearance change. The theme follows it only while
    /// no explicit choice is stored.
    pub fn set_system_preference(&self, dark: bool) -> Theme {
        let mut state = self.state();
        state.system_dark = dark;
        if !state.explicit {
            state.theme = system_theme(dark);
        }
        state.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use ticktock_core::storage::{keys, KeyValueStore, MemoryStore};

    fn controller(system_dark: bool) -> (Arc<MemoryStore>, ThemeController) {
        let store = Arc::new(MemoryStore::new());
        let theme = ThemeController::new(ThemeStorage::new(store.clone()), system_dark);
        (store, theme)
    }

    #[test]
    fn test_follows_system_without_choice() {
        let (_, theme) = controller(true);
        assert!(theme.is_dark());
        assert!(!theme.is_explicit());

        assert_eq!(theme.set_system_preference(false), Theme::Light);
    }

    #[test]
    fn test_stored_choice_wins() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::DARK_MODE, "false").unwrap();

        let theme = ThemeController::new(ThemeStorage::new(store), true);
        assert_eq!(theme.theme(), Theme::Light);
        assert_eq!(theme.set_system_preference(true), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let (store, theme) = controller(false);
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(store.get(keys::DARK_MODE).unwrap(), Some("true".into()));
        assert_eq!(theme.palette(), Theme::Dark.palette());
    }

    #[test]
    fn test_apply_preference() {
        let (store, theme) = controller(true);

        assert_eq!(theme.apply_preference(ThemePreference::Light), Theme::Light);
        assert!(theme.is_explicit());

        assert_eq!(theme.apply_preference(ThemePreference::System), Theme::Dark);
        assert!(!theme.is_explicit());
        assert_eq!(store.get(keys::DARK_MODE).unwrap(), None);
    }
}
