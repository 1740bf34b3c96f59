//! Data quality validation logic.
//!
//! This module handles the content checks on critical columns:
//! - Nulls: per-column null counts with a warning band and an error band
//! - Value range: observed min/max and counts outside the plausible bounds
//! - Temporal: unparseable dates, year bounds and future-dated samples
//!
//! Absent critical columns are skipped, never required.

use crate::timestamp::coerce_timestamp;
use crate::{DataTable, ValidationError, ValidationWarning};
use chrono::{Datelike, Local, NaiveDateTime};
use serde_json::{Map, json};
use tracing::debug;
use wq_core::{DataConstraints, SchemaDefinition, ValidationResult, ValidationResultBuilder};

/// Null share above which a column is an error.
const NULL_ERROR_PERCENT: f64 = 50.0;

/// Null share above which a column is a warning.
const NULL_WARNING_PERCENT: f64 = 10.0;

/// Validates data quality of the critical columns.
pub struct QualityValidator {
    constraints: &'static DataConstraints,
}

impl QualityValidator {
    /// Creates a new quality validator.
    pub fn new(constraints: &'static DataConstraints) -> Self {
        Self { constraints }
    }

    /// Validates null shares, value ranges and dates.
    pub fn validate(&self, schema: &SchemaDefinition, table: &DataTable) -> ValidationResult {
        let mut result = ValidationResultBuilder::new();

        if table.is_empty() {
            result.add_error(ValidationError::EmptyQualityInput);
            return result.finalize();
        }

        self.check_nulls(schema, table, &mut result);
        self.check_value_range(schema.critical.value, table, &mut result);
        self.check_dates(schema.critical.timestamp, table, &mut result);

        let result = result.finalize();
        debug!(
            "Quality pass ({}): {} errors, {} warnings",
            schema.variant,
            result.errors().len(),
            result.warnings().len()
        );
        result
    }

    /// Records null counts per critical column and flags high null shares.
    fn check_nulls(
        &self,
        schema: &SchemaDefinition,
        table: &DataTable,
        result: &mut ValidationResultBuilder,
    ) {
        let total = table.len();
        let mut null_counts = Map::new();

        for column in schema.critical.null_checked() {
            if !table.has_column(column) {
                continue;
            }

            let count = table.null_count(column);
            if count == 0 {
                continue;
            }

            // multiply first so 1 of 10 is exactly 10.0
            let percent = count as f64 * 100.0 / total as f64;
            null_counts.insert(
                column.to_string(),
                json!({ "count": count, "percent": percent }),
            );

            if percent > NULL_ERROR_PERCENT {
                result.add_error(ValidationError::ExcessiveNulls {
                    column: column.to_string(),
                    count,
                    percent,
                });
            } else if percent > NULL_WARNING_PERCENT {
                result.add_warning(ValidationWarning::ElevatedNulls {
                    column: column.to_string(),
                    count,
                    percent,
                });
            }
        }

        if !null_counts.is_empty() {
            result.add_info("null_counts", null_counts);
        }
    }

    /// Records the numeric range of the value column and counts implausible values.
    ///
    /// Non-numeric cells are ignored here; the schema pass reports them as a dtype
    /// mismatch.
    fn check_value_range(
        &self,
        column: &str,
        table: &DataTable,
        result: &mut ValidationResultBuilder,
    ) {
        if !table.has_column(column) {
            return;
        }

        let values: Vec<f64> = table
            .column_values(column)
            .filter_map(|v| v.as_float())
            .collect();
        if values.is_empty() {
            return;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        result.add_info("value_range", json!({ "min": min, "max": max }));

        if self.constraints.below_min(min) {
            let count = values.iter().filter(|v| self.constraints.below_min(**v)).count();
            result.add_warning(ValidationWarning::BelowMinimum {
                count,
                threshold: self.constraints.min_value,
            });
        }

        if self.constraints.above_max(max) {
            let count = values.iter().filter(|v| self.constraints.above_max(**v)).count();
            result.add_warning(ValidationWarning::AboveMaximum {
                count,
                threshold: self.constraints.max_value,
            });
        }
    }

    /// Coerces the timestamp column and checks parse failures, year bounds and
    /// future dates.
    fn check_dates(&self, column: &str, table: &DataTable, result: &mut ValidationResultBuilder) {
        if !table.has_column(column) {
            return;
        }

        let mut unparseable = 0usize;
        let mut dates: Vec<NaiveDateTime> = Vec::new();
        for value in table.column_values(column) {
            if value.is_null() {
                continue;
            }
            match coerce_timestamp(value) {
                Some(ts) => dates.push(ts),
                None => unparseable += 1,
            }
        }

        if unparseable > 0 {
            result.add_error(ValidationError::UnparseableDates(unparseable));
        }

        let (Some(earliest), Some(latest)) = (dates.iter().min(), dates.iter().max()) else {
            return;
        };

        result.add_info(
            "date_range",
            json!({
                "min": earliest.to_string(),
                "max": latest.to_string(),
            }),
        );

        if earliest.year() < self.constraints.min_year {
            result.add_warning(ValidationWarning::DatesBeforeMinYear {
                min_year: self.constraints.min_year,
                earliest: earliest.year(),
            });
        }

        if latest.year() > self.constraints.max_year {
            result.add_error(ValidationError::DatesAfterMaxYear {
                max_year: self.constraints.max_year,
                latest: latest.year(),
            });
        }

        let now = Local::now().naive_local();
        let future = dates.iter().filter(|ts| **ts > now).count();
        if future > 0 {
            result.add_warning(ValidationWarning::FutureTimestamps(future));
        }
    }
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::new(DataConstraints::catalog())
    }
}
