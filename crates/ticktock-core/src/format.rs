//! Display arithmetic for timer readouts

use crate::models::TimeFormat;

const CS_PER_SECOND: u64 = 100;
const CS_PER_MINUTE: u64 = 60 * CS_PER_SECOND;
const CS_PER_HOUR: u64 = 60 * CS_PER_MINUTE;
const CS_PER_DAY: u64 = 24 * CS_PER_HOUR;

/// Floor decomposition of a millisecond duration into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub centiseconds: u64,
}

impl Breakdown {
    pub fn from_millis(ms: u64) -> Self {
        let total_cs = ms / 10;
        Self {
            days: total_cs / CS_PER_DAY,
            hours: (total_cs % CS_PER_DAY) / CS_PER_HOUR,
            minutes: (total_cs % CS_PER_HOUR) / CS_PER_MINUTE,
            seconds: (total_cs % CS_PER_MINUTE) / CS_PER_SECOND,
            centiseconds: total_cs % CS_PER_SECOND,
        }
    }

    /// Hours with whole days folded in.
    pub fn total_hours(&self) -> u64 {
        self.days * 24 + self.hours
    }
}

/// Stopwatch readout.
///
/// `Hms` folds days into the hour field (`26:00:00.00` after 26 hours);
/// `Dhms` always shows a day field.
pub fn format_stopwatch(ms: u64, format: TimeFormat) -> String {
    let b = Breakdown::from_millis(ms);
    match format {
        TimeFormat::Hms => format!(
            "{:02}:{:02}:{:02}.{:02}",
            b.total_hours(),
            b.minutes,
            b.seconds,
            b.centiseconds
        ),
        TimeFormat::Dhms => format!(
            "{:02}:{:02}:{:02}:{:02}.{:02}",
            b.days, b.hours, b.minutes, b.seconds, b.centiseconds
        ),
    }
}

/// Lap table cell, `HH:MM:SS.cc` with unbounded hours.
pub fn format_lap_time(ms: u64) -> String {
    format_stopwatch(ms, TimeFormat::Hms)
}

/// Whole seconds left on a countdown, rounded up so a running timer never
/// reads zero while time remains.
pub fn countdown_seconds(remaining_ms: u64) -> u64 {
    remaining_ms.div_ceil(1000)
}

/// Custom timer readout, `HH:MM:SS`.
pub fn format_countdown_hms(remaining_ms: u64) -> String {
    let total = countdown_seconds(remaining_ms);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Pomodoro readout, `MM:SS` with unbounded minutes.
pub fn format_countdown_ms(remaining_ms: u64) -> String {
    let total = countdown_seconds(remaining_ms);
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown() {
        let ms = ((((2 * 24 + 3) * 60 + 4) * 60 + 5) * 1000) + 678;
        let b = Breakdown::from_millis(ms);
        assert_eq!(
            b,
            Breakdown {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
                centiseconds: 67,
            }
        );
        assert_eq!(b.total_hours(), 51);
    }

    #[test]
    fn test_centiseconds_floor() {
        assert_eq!(Breakdown::from_millis(19).centiseconds, 1);
        assert_eq!(Breakdown::from_millis(999).centiseconds, 99);
        assert_eq!(Breakdown::from_millis(1009).centiseconds, 0);
    }

    #[test]
    fn test_format_stopwatch() {
        assert_eq!(format_stopwatch(0, TimeFormat::Hms), "00:00:00.00");
        assert_eq!(format_stopwatch(61_230, TimeFormat::Hms), "00:01:01.23");

        let day_and_two_hours = 26 * 3_600_000;
        assert_eq!(
            format_stopwatch(day_and_two_hours, TimeFormat::Hms),
            "26:00:00.00"
        );
        assert_eq!(
            format_stopwatch(day_and_two_hours, TimeFormat::Dhms),
            "01:02:00:00.00"
        );
    }

    #[test]
    fn test_countdown_rounds_up() {
        assert_eq!(countdown_seconds(0), 0);
        assert_eq!(countdown_seconds(1), 1);
        assert_eq!(countdown_seconds(1000), 1);
        assert_eq!(countdown_seconds(1001), 2);
        assert_eq!(format_countdown_hms(4_200), "00:00:05");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown_hms(5_000), "00:00:05");
        assert_eq!(format_countdown_hms(3_723_000), "01:02:03");
        assert_eq!(format_countdown_ms(25 * 60_000), "25:00");
        assert_eq!(format_countdown_ms(90 * 60_000), "90:00");
    }
}
