//! Business rule validation logic.
//!
//! This module handles the domain rules on a table:
//! - Duplicates: rows repeating an earlier (timestamp, station, parameter) key
//! - Cardinality: distinct stations and parameters, station id length
//! - Code sets: qualifier flags and QA status codes against the catalog
//!
//! Absent columns turn the corresponding rule into a no-op.

use crate::{DType, DataTable, DataValue, ValidationError, ValidationWarning};
use std::collections::HashSet;
use tracing::debug;
use wq_core::{DataConstraints, SchemaDefinition, ValidationResult, ValidationResultBuilder};

/// Column the QA status check reads, whatever the schema variant.
///
/// Both variants happen to share this name; the check is not variant-aware.
pub const QA_STATUS_COLUMN: &str = "qa_status";

/// Validates domain rules on a table.
pub struct BusinessRuleValidator {
    constraints: &'static DataConstraints,
}

impl BusinessRuleValidator {
    /// Creates a new business rule validator.
    pub fn new(constraints: &'static DataConstraints) -> Self {
        Self { constraints }
    }

    /// Validates duplicates, cardinalities and code sets.
    pub fn validate(&self, schema: &SchemaDefinition, table: &DataTable) -> ValidationResult {
        let mut result = ValidationResultBuilder::new();

        if table.is_empty() {
            return result.finalize();
        }

        let critical = &schema.critical;
        self.check_duplicates(&critical.identity_key(), table, &mut result);
        self.check_stations(critical.station, table, &mut result);
        self.check_parameters(critical.parameter, table, &mut result);

        let unknown = self.unknown_codes(table, critical.qualifier, |code| {
            self.constraints.is_valid_qualifier(code)
        });
        if !unknown.is_empty() {
            result.add_warning(ValidationWarning::UnknownQualifiers(unknown));
        }

        let unknown = self.unknown_codes(table, QA_STATUS_COLUMN, |code| {
            self.constraints.is_valid_qa_status(code)
        });
        if !unknown.is_empty() {
            result.add_warning(ValidationWarning::UnknownQaStatus(unknown));
        }

        let result = result.finalize();
        debug!(
            "Business rule pass ({}): {} errors, {} warnings",
            schema.variant,
            result.errors().len(),
            result.warnings().len()
        );
        result
    }

    /// Counts rows whose key repeats an earlier row's key.
    ///
    /// A group of `n` identical keys contributes `n - 1`.
    fn check_duplicates(
        &self,
        key_columns: &[&str],
        table: &DataTable,
        result: &mut ValidationResultBuilder,
    ) {
        if !key_columns.iter().all(|c| table.has_column(c)) {
            return;
        }

        let mut seen = HashSet::new();
        let mut duplicates = 0usize;

        for row in table.rows() {
            let key: Vec<String> = key_columns
                .iter()
                .map(|c| {
                    row.get(*c)
                        .map(DataValue::identity_key)
                        .unwrap_or_else(|| DataValue::Null.identity_key())
                })
                .collect();

            if !seen.insert(key) {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            result.add_warning(ValidationWarning::DuplicateRecords(duplicates));
            result.add_info("duplicate_count", duplicates);
        }
    }

    fn check_stations(&self, column: &str, table: &DataTable, result: &mut ValidationResultBuilder) {
        if !table.has_column(column) {
            return;
        }

        let unique = distinct_values(table, column).len();
        result.add_info("unique_stations", unique);
        if unique == 0 {
            result.add_error(ValidationError::NoStations);
        }

        if table.dtype(column) == Some(DType::Object) {
            let longest = table
                .column_values(column)
                .filter_map(DataValue::as_string)
                .map(|s| s.chars().count())
                .max();
            if let Some(length) = longest {
                if length > self.constraints.max_station_id_length {
                    result.add_warning(ValidationWarning::StationIdTooLong {
                        length,
                        max: self.constraints.max_station_id_length,
                    });
                }
            }
        }
    }

    fn check_parameters(
        &self,
        column: &str,
        table: &DataTable,
        result: &mut ValidationResultBuilder,
    ) {
        if !table.has_column(column) {
            return;
        }

        let mut parameters = distinct_values(table, column);
        result.add_info("unique_parameters", parameters.len());
        if parameters.is_empty() {
            result.add_error(ValidationError::NoParameters);
        }

        parameters.sort_by_key(|v| v.to_string());
        let listed: Vec<serde_json::Value> = parameters.iter().map(|v| v.to_json()).collect();
        result.add_info("parameters", listed);
    }

    /// Distinct non-null codes of `column`, in first-appearance order, that `is_valid`
    /// rejects.
    fn unknown_codes(
        &self,
        table: &DataTable,
        column: &str,
        is_valid: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        if !table.has_column(column) {
            return Vec::new();
        }

        distinct_values(table, column)
            .iter()
            .map(|v| v.to_string())
            .filter(|code| !is_valid(code))
            .collect()
    }
}

impl Default for BusinessRuleValidator {
    fn default() -> Self {
        Self::new(DataConstraints::catalog())
    }
}

/// Distinct non-null values of a column in first-appearance order.
fn distinct_values<'a>(table: &'a DataTable, column: &'a str) -> Vec<&'a DataValue> {
    let mut seen = HashSet::new();
    table
        .column_values(column)
        .filter(|v| !v.is_null())
        .filter(|v| seen.insert(v.identity_key()))
        .collect()
}
