//! CSV export of the lap ledger

use crate::{format::format_lap_time, models::Lap, Error, Result};
use chrono::{Local, NaiveDate};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LAP_CSV_HEADER: [&str; 4] = ["Lap Number", "Total Time", "Lap Time", "Timestamp"];

pub fn lap_export_filename(date: NaiveDate) -> String {
    format!("stopwatch-laps-{}.csv", date.format("%Y-%m-%d"))
}

/// Write `laps` in stored order. Timestamps are rendered in local time.
pub fn write_laps_csv<W: Write>(laps: &[Lap], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(LAP_CSV_HEADER)?;

    for lap in laps {
        let timestamp = lap
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        csv.write_record([
            lap.number.to_string(),
            format_lap_time(lap.total_ms),
            format_lap_time(lap.lap_ms),
            timestamp,
        ])?;
    }

    csv.flush()?;
    Ok(())
}

pub fn export_laps(dir: &Path, laps: &[Lap], date: NaiveDate) -> Result<PathBuf> {
    if laps.is_empty() {
        return Err(Error::Validation("No laps to export".to_string()));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(lap_export_filename(date));
    let file = std::fs::File::create(&path)?;
    write_laps_csv(laps, file)?;
    Ok(path)
}
