//! Stopwatch lap ledger

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lap {
    pub number: u32,
    #[serde(rename = "totalTime")]
    pub total_ms: u64,
    #[serde(rename = "lapTime")]
    pub lap_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// A destructive ledger operation waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingLapAction {
    /// Remove the lap stored at `index`, which carried `number` when the
    /// request was made.
    Delete { index: usize, number: u32 },
    ClearAll,
}

/// Ordered lap list, oldest first, plus the numbering counter.
#[derive(Debug, Clone, PartialEq)]
pub struct LapLedger {
    laps: Vec<Lap>,
    next_number: u32,
    pending: Option<PendingLapAction>,
}

impl LapLedger {
    pub fn new() -> Self {
        Self {
            laps: Vec::new(),
            next_number: 1,
            pending: None,
        }
    }

    /// Rebuild a ledger from persisted parts. The counter is bumped past the
    /// highest stored number so numbers are never reused.
    pub fn from_parts(laps: Vec<Lap>, next_number: u32) -> Self {
        let floor = laps.iter().map(|l| l.number.saturating_add(1)).max().unwrap_or(1);
        Self {
            laps,
            next_number: next_number.max(floor),
            pending: None,
        }
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    pub fn next_number(&self) -> u32 {
        self.next_number
    }

    pub fn last(&self) -> Option<&Lap> {
        self.laps.last()
    }

    /// Append a lap captured at cumulative time `total_ms`.
    pub fn record(&mut self, total_ms: u64, timestamp: DateTime<Utc>) -> &Lap {
        let previous = self.laps.last().map(|l| l.total_ms).unwrap_or(0);
        let lap = Lap {
            number: self.next_number,
            total_ms,
            lap_ms: total_ms.saturating_sub(previous),
            timestamp,
        };
        self.next_number = self.next_number.saturating_add(1);
        self.laps.push(lap);
        &self.laps[self.laps.len() - 1]
    }

    /// Laps newest first, the order they are shown in.
    pub fn display_order(&self) -> impl Iterator<Item = &Lap> {
        self.laps.iter().rev()
    }

    /// Map a newest-first display position to a storage index.
    pub fn storage_index(&self, display_pos: usize) -> Option<usize> {
        if display_pos < self.laps.len() {
            Some(self.laps.len() - 1 - display_pos)
        } else {
            None
        }
    }

    pub fn request_delete(&mut self, index: usize) -> Result<&Lap> {
        let lap = self.laps.get(index).ok_or_else(|| {
            Error::Validation(format!(
                "Lap index {} out of range ({} laps)",
                index,
                self.laps.len()
            ))
        })?;
        self.pending = Some(PendingLapAction::Delete {
            index,
            number: lap.number,
        });
        Ok(lap)
    }

    /// Ask to clear every lap. Returns `false` when there is nothing to clear.
    pub fn request_clear(&mut self) -> bool {
        if self.laps.is_empty() {
            return false;
        }
        self.pending = Some(PendingLapAction::ClearAll);
        true
    }

    pub fn pending(&self) -> Option<PendingLapAction> {
        self.pending
    }

    pub fn cancel_pending(&mut self) -> Option<PendingLapAction> {
        self.pending.take()
    }

    /// Apply the pending action.
    pub fn confirm_pending(&mut self) -> Result<PendingLapAction> {
        let action = self
            .pending
            .take()
            .ok_or_else(|| Error::Validation("No lap action awaiting confirmation".to_string()))?;

        match action {
            PendingLapAction::Delete { index, number } => {
                if self.laps.get(index).map(|l| l.number) != Some(number) {
                    return Err(Error::InvalidData(format!(
                        "Lap {} is no longer at position {}",
                        number, index
                    )));
                }
                self.laps.remove(index);
            }
            PendingLapAction::ClearAll => {
                self.laps.clear();
                self.next_number = 1;
            }
        }

        Ok(action)
    }
}

impl Default for LapLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(totals: &[u64]) -> LapLedger {
        let mut ledger = LapLedger::new();
        for total in totals {
            ledger.record(*total, Utc::now());
        }
        ledger
    }

    #[test]
    fn test_first_lap_delta_equals_total() {
        let ledger = ledger_with(&[500]);
        let lap = &ledger.laps()[0];
        assert_eq!(lap.number, 1);
        assert_eq!(lap.lap_ms, lap.total_ms);
    }

    #[test]
    fn test_lap_deltas() {
        let ledger = ledger_with(&[1_000, 2_500, 2_600]);
        let deltas: Vec<u64> = ledger.laps().iter().map(|l| l.lap_ms).collect();
        assert_eq!(deltas, vec![1_000, 1_500, 100]);
    }

    #[test]
    fn test_numbers_never_reused_after_delete() {
        let mut ledger = ledger_with(&[100, 200, 300]);

        ledger.request_delete(2).unwrap();
        ledger.confirm_pending().unwrap();

        let lap = ledger.record(400, Utc::now());
        assert_eq!(lap.number, 4);

        let numbers: Vec<u32> = ledger.laps().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 4]);
    }

    #[test]
    fn test_delete_keeps_other_deltas() {
        let mut ledger = ledger_with(&[1_000, 3_000, 6_000]);

        ledger.request_delete(1).unwrap();
        ledger.confirm_pending().unwrap();

        let remaining: Vec<(u32, u64)> =
            ledger.laps().iter().map(|l| (l.number, l.lap_ms)).collect();
        assert_eq!(remaining, vec![(1, 1_000), (3, 3_000)]);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut ledger = ledger_with(&[1_000, 2_000]);

        ledger.request_delete(0).unwrap();
        assert_eq!(ledger.len(), 2);

        ledger.cancel_pending();
        assert!(ledger.confirm_pending().is_err());
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut ledger = ledger_with(&[1_000]);
        assert!(ledger.request_delete(1).is_err());
        assert!(ledger.pending().is_none());
    }

    #[test]
    fn test_stale_delete_is_rejected() {
        let mut ledger = ledger_with(&[1_000, 2_000, 3_000]);

        ledger.request_delete(1).unwrap();
        let stale = ledger.pending().unwrap();

        ledger.request_delete(0).unwrap();
        ledger.confirm_pending().unwrap();

        ledger.pending = Some(stale);
        assert!(ledger.confirm_pending().is_err());
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut ledger = ledger_with(&[1_000, 2_000]);

        assert!(ledger.request_clear());
        assert_eq!(
            ledger.confirm_pending().unwrap(),
            PendingLapAction::ClearAll
        );
        assert!(ledger.is_empty());
        assert_eq!(ledger.next_number(), 1);
    }

    #[test]
    fn test_clear_empty_is_noop() {
        let mut ledger = LapLedger::new();
        assert!(!ledger.request_clear());
        assert!(ledger.pending().is_none());
    }

    #[test]
    fn test_display_order_and_index_translation() {
        let ledger = ledger_with(&[100, 200, 300]);

        let shown: Vec<u32> = ledger.display_order().map(|l| l.number).collect();
        assert_eq!(shown, vec![3, 2, 1]);

        assert_eq!(ledger.storage_index(0), Some(2));
        assert_eq!(ledger.storage_index(2), Some(0));
        assert_eq!(ledger.storage_index(3), None);

        let idx = ledger.storage_index(1).unwrap();
        assert_eq!(ledger.laps()[idx].number, 2);
    }

    #[test]
    fn test_from_parts_bumps_counter() {
        let laps = ledger_with(&[100, 200]).laps().to_vec();
        let ledger = LapLedger::from_parts(laps, 1);
        assert_eq!(ledger.next_number(), 3);
    }

    #[test]
    fn test_counter_saturates_at_max() {
        let mut ledger = LapLedger::from_parts(Vec::new(), u32::MAX);
        assert_eq!(ledger.record(100, Utc::now()).number, u32::MAX);
        assert_eq!(ledger.next_number(), u32::MAX);
    }

    #[test]
    fn test_lap_json_field_names() {
        let ledger = ledger_with(&[1_234]);
        let json = serde_json::to_value(&ledger.laps()[0]).unwrap();
        assert_eq!(json["number"], 1);
        assert_eq!(json["totalTime"], 1_234);
        assert_eq!(json["lapTime"], 1_234);
        assert!(json["timestamp"].is_string());
    }
}
