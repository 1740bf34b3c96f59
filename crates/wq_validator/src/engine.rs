//! Main validation engine.
//!
//! This module provides the `DataValidator` that binds a schema variant once and
//! orchestrates the schema, quality and business rule passes.

use crate::{BusinessRuleValidator, DataTable, QualityValidator, SchemaValidator};
use tracing::info;
use wq_core::{DataConstraints, SchemaDefinition, SchemaVariant, ValidationResult};

/// Main validation engine for monitoring records.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads and reused for any number of tables.
///
/// # Example
///
/// ```rust
/// use wq_validator::{DataTable, DataValidator, DataValue, row};
/// use wq_core::SchemaVariant;
///
/// let validator = DataValidator::new(SchemaVariant::Normalized);
/// let table = DataTable::from_rows(vec![row([
///     ("station_id", DataValue::from("BC08MF0001")),
///     ("timestamp", DataValue::from("2024-01-15 10:30:00")),
///     ("parameter", DataValue::from("PH (FIELD)")),
///     ("value", DataValue::Float(7.4)),
///     ("unit", DataValue::from("PH UNITS")),
/// ])]);
///
/// let result = validator.validate_all(&table);
/// if !result.is_valid() {
///     for error in result.errors() {
///         println!("Error: {}", error);
///     }
/// }
/// ```
pub struct DataValidator {
    variant: SchemaVariant,
    schema: &'static SchemaDefinition,
    schema_validator: SchemaValidator,
    quality_validator: QualityValidator,
    business_validator: BusinessRuleValidator,
}

impl DataValidator {
    /// Creates a validator bound to `variant` and the shared constraint catalog.
    pub fn new(variant: SchemaVariant) -> Self {
        Self::with_constraints(variant, DataConstraints::catalog())
    }

    /// Creates a validator bound to `variant` with an explicit constraint catalog.
    pub fn with_constraints(variant: SchemaVariant, constraints: &'static DataConstraints) -> Self {
        Self {
            variant,
            schema: variant.definition(),
            schema_validator: SchemaValidator::new(),
            quality_validator: QualityValidator::new(constraints),
            business_validator: BusinessRuleValidator::new(constraints),
        }
    }

    /// The bound schema variant.
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// The bound schema definition.
    pub fn schema(&self) -> &'static SchemaDefinition {
        self.schema
    }

    /// Structural pass: row presence, required/unexpected columns, dtypes.
    pub fn validate_schema(&self, table: &DataTable) -> ValidationResult {
        self.schema_validator.validate(self.schema, table)
    }

    /// Content pass: null shares, value range, dates.
    pub fn validate_data_quality(&self, table: &DataTable) -> ValidationResult {
        self.quality_validator.validate(self.schema, table)
    }

    /// Domain pass: duplicates, cardinalities, code sets.
    pub fn validate_business_rules(&self, table: &DataTable) -> ValidationResult {
        self.business_validator.validate(self.schema, table)
    }

    /// Runs all three passes in fixed order and merges their findings.
    ///
    /// Errors and warnings keep pass order; info keys from later passes
    /// overwrite earlier ones. Validity is recomputed from the merged errors.
    pub fn validate_all(&self, table: &DataTable) -> ValidationResult {
        info!(
            "Validating {} rows against {} schema",
            table.len(),
            self.variant
        );

        let result = ValidationResult::merge_all([
            self.validate_schema(table),
            self.validate_data_quality(table),
            self.validate_business_rules(table),
        ]);

        info!(
            "Validation {}: {} errors, {} warnings",
            if result.is_valid() { "passed" } else { "failed" },
            result.errors().len(),
            result.warnings().len()
        );
        result
    }

    /// See [`crate::dtypes_compatible`].
    pub fn dtypes_compatible(&self, actual: &str, expected: &str) -> bool {
        crate::dtypes_compatible(actual, expected)
    }
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::new(SchemaVariant::default())
    }
}

/// Validates a table against `variant` with every pass.
pub fn validate(table: &DataTable, variant: SchemaVariant) -> ValidationResult {
    DataValidator::new(variant).validate_all(table)
}

/// Validates a table in the raw source layout.
pub fn validate_raw_data(table: &DataTable) -> ValidationResult {
    validate(table, SchemaVariant::Raw)
}

/// Validates a table in the normalized layout.
pub fn validate_normalized_data(table: &DataTable) -> ValidationResult {
    validate(table, SchemaVariant::Normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataValue, row};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn normalized_row(station: &str, parameter: &str, value: f64) -> crate::DataRow {
        row([
            ("station_id", DataValue::from(station)),
            ("timestamp", DataValue::from("2024-01-15 10:30:00")),
            ("parameter", DataValue::from(parameter)),
            ("value", DataValue::Float(value)),
            ("unit", DataValue::from("MG/L")),
        ])
    }

    #[test]
    fn test_validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataValidator>();
    }

    #[test]
    fn test_default_binds_raw() {
        assert_eq!(DataValidator::default().variant(), SchemaVariant::Raw);
    }

    #[test]
    fn test_validate_all_clean_table() {
        let table = DataTable::from_rows(vec![
            normalized_row("S1", "PH", 7.2),
            normalized_row("S2", "PH", 7.9),
        ]);
        let result = validate_normalized_data(&table);

        assert!(result.is_valid(), "errors: {:?}", result.errors());
        assert_eq!(result.info_value("row_count"), Some(&json!(2)));
        assert_eq!(result.info_value("unique_stations"), Some(&json!(2)));
        assert_eq!(result.info_value("parameters"), Some(&json!(["PH"])));
    }

    #[test]
    fn test_validate_all_keeps_pass_order() {
        let mut bad = normalized_row("S1", "PH", 7.2);
        bad.insert("timestamp".into(), DataValue::from("yesterday"));
        let mut rows = vec![bad, normalized_row("S1", "PH", 2e9)];
        for r in &mut rows {
            r.remove("unit");
        }
        let table = DataTable::from_rows(rows);

        let result = validate_normalized_data(&table);
        assert!(!result.is_valid());
        assert_eq!(
            result.errors(),
            [
                "Missing required columns: unit",
                "1 datetime values could not be parsed"
            ]
        );
        assert_eq!(
            result.warnings().last().map(String::as_str),
            Some("1 values above maximum threshold (1000000000.0)")
        );
    }

    #[test]
    fn test_empty_table_reports_schema_and_quality() {
        let result = validate(&DataTable::new(["station_id"]), SchemaVariant::Normalized);
        assert_eq!(
            result.errors(),
            [
                "table is empty (0 rows)",
                "cannot validate quality of empty table"
            ]
        );
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_individual_passes_match_validate_all() {
        let table = DataTable::from_rows(vec![normalized_row("S1", "PH", -5000.0)]);
        let validator = DataValidator::new(SchemaVariant::Normalized);

        let schema = validator.validate_schema(&table);
        let quality = validator.validate_data_quality(&table);
        let business = validator.validate_business_rules(&table);
        let all = validator.validate_all(&table);

        let expected_warnings: Vec<String> = [&schema, &quality, &business]
            .iter()
            .flat_map(|r| r.warnings().iter().cloned())
            .collect();
        assert_eq!(all.warnings(), expected_warnings.as_slice());
        assert_eq!(all.is_valid(), all.errors().is_empty());
    }

    #[test]
    fn test_dtypes_compatible_delegates() {
        let validator = DataValidator::new(SchemaVariant::Raw);
        assert!(validator.dtypes_compatible("int64", "float64"));
        assert!(!validator.dtypes_compatible("object", "float64"));
    }
}
