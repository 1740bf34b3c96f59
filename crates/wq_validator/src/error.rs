//! Validation findings.
//!
//! Every message a pass can record is a variant here; its `Display` output is the
//! exact text stored in the [`wq_core::ValidationResult`].

use thiserror::Error;

/// Findings that make a table invalid.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Table has no rows
    #[error("table is empty (0 rows)")]
    EmptyTable,

    /// Quality pass was asked to inspect a table with no rows
    #[error("cannot validate quality of empty table")]
    EmptyQualityInput,

    /// Required columns are absent
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// More than half of a critical column is null
    #[error("Column '{column}' has {} null values ({percent:.1}%)", group_thousands(.count))]
    ExcessiveNulls {
        column: String,
        count: usize,
        percent: f64,
    },

    /// Non-null values that could not be read as timestamps
    #[error("{0} datetime values could not be parsed")]
    UnparseableDates(usize),

    /// Latest sample lies beyond the valid year range
    #[error("Dates after {max_year} found (latest: {latest})")]
    DatesAfterMaxYear { max_year: i32, latest: i32 },

    /// Station column holds no values
    #[error("No unique stations found")]
    NoStations,

    /// Parameter column holds no values
    #[error("No unique parameters found")]
    NoParameters,
}

/// Advisory findings that never affect validity.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationWarning {
    /// Columns not declared by the schema variant
    #[error("Unexpected columns found: {}", .0.join(", "))]
    UnexpectedColumns(Vec<String>),

    /// Summary line preceding the individual type mismatches
    #[error("Data type mismatches found:")]
    TypeMismatchSummary,

    /// Observed dtype does not satisfy the declared type
    #[error("  - {column}: expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// Between 10% and 50% of a critical column is null
    #[error("Column '{column}' has {} null values ({percent:.1}%)", group_thousands(.count))]
    ElevatedNulls {
        column: String,
        count: usize,
        percent: f64,
    },

    /// Values below the plausible minimum
    #[error("{count} values below minimum threshold ({threshold:.1})")]
    BelowMinimum { count: usize, threshold: f64 },

    /// Values above the plausible maximum
    #[error("{count} values above maximum threshold ({threshold:.1})")]
    AboveMaximum { count: usize, threshold: f64 },

    /// Earliest sample predates the year range
    #[error("Dates before {min_year} found (earliest: {earliest})")]
    DatesBeforeMinYear { min_year: i32, earliest: i32 },

    /// Samples dated after the current time
    #[error("{0} timestamps are in the future")]
    FutureTimestamps(usize),

    /// Rows repeating an earlier (timestamp, station, parameter) key
    #[error("{0} duplicate records found (same timestamp + station + parameter)")]
    DuplicateRecords(usize),

    /// Station identifiers longer than the catalog allows
    #[error("Station IDs exceed max length ({length} > {max})")]
    StationIdTooLong { length: usize, max: usize },

    /// Qualifier codes outside the catalog
    #[error("Unknown qualifier codes found: {}", .0.join(", "))]
    UnknownQualifiers(Vec<String>),

    /// QA status codes outside the catalog
    #[error("Unknown QA status codes found: {}", .0.join(", "))]
    UnknownQaStatus(Vec<String>),
}

/// Formats a count with comma thousands separators.
fn group_thousands(n: &usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
