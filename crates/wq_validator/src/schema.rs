//! Schema validation logic.
//!
//! This module checks the structural shape of a table against a schema variant:
//! row presence, required columns, unexpected columns and dtype compatibility.
//! Only an empty table or a missing required column is an error; everything else
//! this pass finds is a warning.

use crate::{DataTable, ValidationError, ValidationWarning};
use tracing::debug;
use wq_core::{SchemaDefinition, ValidationResult, ValidationResultBuilder};

/// Validates the structure of a table against a schema definition.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Creates a new schema validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates a table against the schema.
    pub fn validate(&self, schema: &SchemaDefinition, table: &DataTable) -> ValidationResult {
        let mut result = ValidationResultBuilder::new();

        if table.is_empty() {
            result.add_error(ValidationError::EmptyTable);
            return result.finalize();
        }

        result.add_info("row_count", table.len());
        result.add_info("column_count", table.column_count());

        let missing: Vec<String> = schema
            .required_columns()
            .into_iter()
            .filter(|column| !table.has_column(column))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            result.add_info("missing_columns", missing.clone());
            result.add_error(ValidationError::MissingColumns(missing));
        }

        let unexpected: Vec<String> = table
            .columns()
            .iter()
            .filter(|column| !schema.is_known(column))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            result.add_info("unexpected_columns", unexpected.clone());
            result.add_warning(ValidationWarning::UnexpectedColumns(unexpected));
        }

        let mismatches = self.dtype_mismatches(schema, table);
        if !mismatches.is_empty() {
            result.add_warning(ValidationWarning::TypeMismatchSummary);
            for mismatch in mismatches {
                result.add_warning(mismatch);
            }
        }

        let result = result.finalize();
        debug!(
            "Schema pass ({}): {} errors, {} warnings",
            schema.variant,
            result.errors().len(),
            result.warnings().len()
        );
        result
    }

    /// Compares the observed dtype of every declared column with its declared type.
    fn dtype_mismatches(
        &self,
        schema: &SchemaDefinition,
        table: &DataTable,
    ) -> Vec<ValidationWarning> {
        let mut mismatches = Vec::new();

        for column in table.columns() {
            let Some(expected) = schema.expected_type(column) else {
                continue;
            };
            let Some(actual) = table.dtype(column) else {
                continue;
            };

            if !dtypes_compatible(actual.label(), expected.label()) {
                mismatches.push(ValidationWarning::TypeMismatch {
                    column: column.clone(),
                    expected: expected.label().to_string(),
                    actual: actual.label().to_string(),
                });
            }
        }

        mismatches
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if an observed dtype satisfies a declared type.
///
/// Both labels are compared case-insensitively. The declared type drives the
/// decision: floats accept any 32/64-bit integer or float, strings accept
/// `object`, and any two datetime/timestamp labels are compatible.
pub fn dtypes_compatible(actual: &str, expected: &str) -> bool {
    let actual = normalize_type(actual);
    let expected = normalize_type(expected);

    if actual == expected {
        return true;
    }

    if expected == "float64"
        && matches!(actual.as_str(), "float32" | "float64" | "int64" | "int32")
    {
        return true;
    }

    if expected == "string" && matches!(actual.as_str(), "object" | "string") {
        return true;
    }

    is_temporal(&expected) && is_temporal(&actual)
}

fn is_temporal(label: &str) -> bool {
    label.contains("datetime") || label.contains("timestamp")
}

/// Normalizes a type string for comparison.
fn normalize_type(type_str: &str) -> String {
    type_str.to_lowercase()
}
