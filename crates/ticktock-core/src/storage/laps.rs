//! Lap ledger persistence

use super::{keys, KeyValueStore};
use crate::{
    models::{Lap, LapLedger},
    Error, Result,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct LapStorage {
    store: Arc<dyn KeyValueStore>,
}

impl LapStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the saved ledger. A missing list is an empty ledger; a missing or
    /// unparsable counter falls back to 1. A malformed list, or one whose
    /// numbers leave no room for another lap, is an error.
    pub fn load(&self) -> Result<LapLedger> {
        let laps: Vec<Lap> = match self.store.get(keys::LAPS)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };
        if let Some(lap) = laps.iter().find(|l| l.number == 0 || l.number == u32::MAX) {
            return Err(Error::InvalidData(format!(
                "Stored lap number {} out of range",
                lap.number
            )));
        }

        let counter = self
            .store
            .get(keys::LAP_COUNTER)?
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);

        Ok(LapLedger::from_parts(laps, counter))
    }

    pub fn save(&self, ledger: &LapLedger) -> Result<()> {
        let content = serde_json::to_string(ledger.laps())?;
        self.store.set(keys::LAPS, &content)?;
        self.store
            .set(keys::LAP_COUNTER, &ledger.next_number().to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn storage() -> (Arc<MemoryStore>, LapStorage) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), LapStorage::new(store))
    }

    #[test]
    fn test_load_empty() {
        let (_, storage) = storage();
        let ledger = storage.load().unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.next_number(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let (_, storage) = storage();
        let mut ledger = LapLedger::new();
        ledger.record(1_000, Utc::now());
        ledger.record(2_500, Utc::now());
        ledger.request_delete(1).unwrap();
        ledger.confirm_pending().unwrap();

        storage.save(&ledger).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded.laps(), ledger.laps());
        assert_eq!(loaded.next_number(), 3);
    }

    #[test]
    fn test_malformed_laps_is_error() {
        let (store, storage) = storage();
        store.set(keys::LAPS, "[{\"number\":").unwrap();
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_out_of_range_lap_number_is_error() {
        let (store, storage) = storage();
        store
            .set(
                keys::LAPS,
                r#"[{"number":4294967295,"totalTime":1000,"lapTime":1000,"timestamp":"2024-01-01T00:00:00Z"}]"#,
            )
            .unwrap();
        assert!(matches!(storage.load(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_bad_counter_falls_back() {
        let (store, storage) = storage();
        store.set(keys::LAP_COUNTER, "abc").unwrap();
        assert_eq!(storage.load().unwrap().next_number(), 1);
    }
}
