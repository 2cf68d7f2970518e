//! Time-related utility functions.
//!
//! Helpers for turning the raw nanosecond values reported by the terminal into
//! something a human (or a data-bus consumer) can read.

use chrono::{DateTime, SecondsFormat, Utc};

/// Duration units in descending order, with their length in seconds.
///
/// Months and years are fixed-length approximations (30 and 365 days).
const UNITS: [(&str, u64); 5] = [
    ("years", 31_536_000),
    ("months", 2_592_000),
    ("days", 86_400),
    ("hours", 3_600),
    ("minutes", 60),
];

/// Format a duration as the largest whole unit that fits at least once.
///
/// Uses floor division and reports only that single magnitude, so 90061
/// seconds (1 day, 1 hour, 1 minute, 1 second) reads as `"1 days"`.
///
/// # Example
///
/// ```
/// use dishwatch::time::format_elapsed;
///
/// assert_eq!(format_elapsed(90061), "1 days");
/// assert_eq!(format_elapsed(45), "45 seconds");
/// ```
pub fn format_elapsed(seconds: u64) -> String {
    for (label, unit) in UNITS {
        let count = seconds / unit;
        if count >= 1 {
            return format!("{} {}", count, label);
        }
    }
    format!("{} seconds", seconds)
}

/// Convert nanoseconds since the Unix epoch into a UTC timestamp.
///
/// Returns `None` for values chrono cannot represent.
pub fn timestamp_from_nanos(nanos: i64) -> Option<DateTime<Utc>> {
    let secs = nanos.div_euclid(1_000_000_000);
    let subsec = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, subsec)
}

/// Render a timestamp as RFC 3339 with second precision (`2024-05-01T12:00:00Z`).
pub fn to_rfc3339(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert a nanosecond duration to whole seconds.
pub fn nanos_to_secs(nanos: u64) -> u64 {
    nanos / 1_000_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_elapsed_picks_largest_unit() {
        assert_eq!(format_elapsed(90_061), "1 days");
        assert_eq!(format_elapsed(45), "45 seconds");
        assert_eq!(format_elapsed(60), "1 minutes");
        assert_eq!(format_elapsed(7_199), "1 hours");
        assert_eq!(format_elapsed(2_592_000), "1 months");
        assert_eq!(format_elapsed(63_072_000), "2 years");
    }

    #[test]
    fn format_elapsed_zero() {
        assert_eq!(format_elapsed(0), "0 seconds");
    }

    #[test]
    fn format_elapsed_boundaries_floor() {
        assert_eq!(format_elapsed(59), "59 seconds");
        assert_eq!(format_elapsed(3_599), "59 minutes");
        assert_eq!(format_elapsed(86_399), "23 hours");
    }

    #[test]
    fn timestamp_from_nanos_epoch() {
        let ts = timestamp_from_nanos(0).unwrap();
        assert_eq!(to_rfc3339(&ts), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn timestamp_from_nanos_truncates_to_seconds_in_rfc3339() {
        // 2021-01-01T00:00:00.5Z
        let ts = timestamp_from_nanos(1_609_459_200_500_000_000).unwrap();
        assert_eq!(to_rfc3339(&ts), "2021-01-01T00:00:00Z");
    }

    #[test]
    fn nanos_to_secs_floors() {
        assert_eq!(nanos_to_secs(1_999_999_999), 1);
        assert_eq!(nanos_to_secs(0), 0);
    }
}
