//! Preset persistence

use super::{keys, KeyValueStore};
use crate::{
    models::{Preset, PresetLedger},
    Result,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PresetStorage {
    store: Arc<dyn KeyValueStore>,
}

impl PresetStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Result<PresetLedger> {
        let presets: Vec<Preset> = match self.store.get(keys::PRESETS)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };
        Ok(PresetLedger::from_presets(presets))
    }

    pub fn save(&self, ledger: &PresetLedger) -> Result<()> {
        let content = serde_json::to_string(ledger.presets())?;
        self.store.set(keys::PRESETS, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_round_trip() {
        let storage = PresetStorage::new(Arc::new(MemoryStore::new()));
        assert!(storage.load().unwrap().is_empty());

        let mut ledger = PresetLedger::new();
        ledger.record(0, 25, 0);
        ledger.record(1, 0, 30);
        storage.save(&ledger).unwrap();

        assert_eq!(storage.load().unwrap(), ledger);
    }

    #[test]
    fn test_reads_camel_case_field_names() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                keys::PRESETS,
                r#"[{"hours":0,"minutes":5,"seconds":0,"name":"0h 5m 0s"}]"#,
            )
            .unwrap();

        let ledger = PresetStorage::new(store).load().unwrap();
        assert_eq!(ledger.get(0).unwrap().minutes, 5);
    }
}
