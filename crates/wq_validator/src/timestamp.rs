//! Lenient timestamp coercion.
//!
//! Unparseable inputs coerce to `None` instead of failing, so a caller can tell
//! "was already null" apart from "failed to parse".

use crate::DataValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// Slashed day-first dates are not accepted; month comes first.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Coerces a cell to a timestamp.
///
/// Returns `None` for nulls and for anything that cannot be interpreted as a
/// point in time.
pub fn coerce_timestamp(value: &DataValue) -> Option<NaiveDateTime> {
    match value {
        DataValue::Timestamp(ts) => Some(*ts),
        DataValue::String(s) => parse_timestamp(s),
        DataValue::Int(epoch) => from_epoch(*epoch),
        _ => None,
    }
}

/// Parses a timestamp string in multiple formats.
///
/// Supports:
/// - RFC 3339 (e.g., "2024-01-15T10:30:00Z"), converted to UTC
/// - "2024-01-15 10:30:00", "2024-01-15T10:30:00", with optional fractional seconds
/// - "2024-01-15 10:30"
/// - Slashed layouts: "2024/01/15 10:30", "01/15/2024 10:30:00" (month first)
/// - Date only (e.g., "2024-01-15", "2024/01/15", "01/15/2024"), start of day
/// - Unix epoch seconds or milliseconds
pub fn parse_timestamp(ts_str: &str) -> Option<NaiveDateTime> {
    let ts_str = ts_str.trim();
    if ts_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts_str) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts_str, format) {
            return Some(naive);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(ts_str, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    if let Ok(epoch) = ts_str.parse::<i64>() {
        return from_epoch(epoch);
    }

    None
}

/// Interprets an integer as unix epoch seconds, or milliseconds when very large.
fn from_epoch(epoch: i64) -> Option<NaiveDateTime> {
    let dt = if epoch > 10_000_000_000 {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    };
    dt.map(|d| d.naive_utc())
}
