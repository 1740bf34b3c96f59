//! Validation results.
//!
//! Each validation pass accumulates findings into a [`ValidationResultBuilder`] and
//! hands the caller a frozen [`ValidationResult`]. Validity is never stored: it is
//! derived from the error list, so a result with errors can never claim to be valid.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Mutable accumulator for a single validation pass.
///
/// # Example
///
/// ```rust
/// use wq_core::ValidationResultBuilder;
///
/// let mut builder = ValidationResultBuilder::new();
/// builder.add_info("row_count", 10);
/// builder.add_error("Missing required columns: unit");
/// assert!(!builder.is_valid());
///
/// let result = builder.finalize();
/// assert_eq!(result.errors(), ["Missing required columns: unit"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationResultBuilder {
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Map<String, Value>,
}

impl ValidationResultBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error. The result is invalid from this point on.
    pub fn add_error(&mut self, error: impl fmt::Display) {
        self.errors.push(error.to_string());
    }

    /// Adds a warning. Warnings never affect validity.
    pub fn add_warning(&mut self, warning: impl fmt::Display) {
        self.warnings.push(warning.to_string());
    }

    /// Records an informational metric, replacing any previous value for `key`.
    pub fn add_info(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.info.insert(key.into(), value.into());
    }

    /// Appends another result's findings.
    ///
    /// Errors and warnings are concatenated in order; info entries overlay the
    /// existing ones, later values winning on key collision.
    pub fn absorb(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        for (key, value) in other.info {
            self.info.insert(key, value);
        }
    }

    /// Whether no error has been recorded so far.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Freezes the accumulated findings.
    pub fn finalize(self) -> ValidationResult {
        ValidationResult {
            errors: self.errors,
            warnings: self.warnings,
            info: self.info,
        }
    }
}

/// Frozen outcome of one or more validation passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Map<String, Value>,
}

impl ValidationResult {
    /// Combines results in order into a single outcome.
    ///
    /// Validity of the combined result is recomputed from the merged errors.
    pub fn merge_all(results: impl IntoIterator<Item = ValidationResult>) -> ValidationResult {
        let mut builder = ValidationResultBuilder::new();
        for result in results {
            builder.absorb(result);
        }
        builder.finalize()
    }

    /// True if and only if there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in the order they were found.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Warnings in the order they were found.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Informational metrics in insertion order.
    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    /// Looks up a single metric.
    pub fn info_value(&self, key: &str) -> Option<&Value> {
        self.info.get(key)
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 4)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.serialize_field("info", &self.info)?;
        state.end()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "✓ Validation PASSED")?;
        } else {
            write!(f, "✗ Validation FAILED")?;
        }

        if !self.errors.is_empty() {
            write!(f, "\n\nErrors ({}):", self.errors.len())?;
            for (i, error) in self.errors.iter().enumerate() {
                write!(f, "\n  {}. {}", i + 1, error)?;
            }
        }

        if !self.warnings.is_empty() {
            write!(f, "\n\nWarnings ({}):", self.warnings.len())?;
            for (i, warning) in self.warnings.iter().enumerate() {
                write!(f, "\n  {}. {}", i + 1, warning)?;
            }
        }

        if !self.info.is_empty() {
            write!(f, "\n\nInfo:")?;
            for (key, value) in &self.info {
                write!(f, "\n  {}: {}", key, value)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_result_is_valid() {
        let result = ValidationResultBuilder::new().finalize();
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_warning_keeps_validity() {
        let mut builder = ValidationResultBuilder::new();
        builder.add_warning("Unexpected columns found: notes");
        assert!(builder.is_valid());
        assert!(builder.finalize().is_valid());
    }

    #[test]
    fn test_error_clears_validity() {
        let mut builder = ValidationResultBuilder::new();
        builder.add_error("table is empty (0 rows)");
        assert!(!builder.is_valid());
        let result = builder.finalize();
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_merge_concatenates_in_order_and_overlays_info() {
        let mut first = ValidationResultBuilder::new();
        first.add_error("e1");
        first.add_warning("w1");
        first.add_info("row_count", 3);
        first.add_info("shared", "first");

        let mut second = ValidationResultBuilder::new();
        second.add_warning("w2");
        second.add_info("shared", "second");
        second.add_info("unique_stations", 2);

        let mut third = ValidationResultBuilder::new();
        third.add_error("e3");

        let merged =
            ValidationResult::merge_all([first.finalize(), second.finalize(), third.finalize()]);

        assert_eq!(merged.errors(), ["e1", "e3"]);
        assert_eq!(merged.warnings(), ["w1", "w2"]);
        assert_eq!(merged.info_value("shared"), Some(&json!("second")));
        let keys: Vec<&String> = merged.info().keys().collect();
        assert_eq!(keys, ["row_count", "shared", "unique_stations"]);
        assert!(!merged.is_valid());
    }

    #[test]
    fn test_merge_of_valid_results_is_valid() {
        let mut only_warnings = ValidationResultBuilder::new();
        only_warnings.add_warning("w");
        let merged = ValidationResult::merge_all([
            ValidationResultBuilder::new().finalize(),
            only_warnings.finalize(),
        ]);
        assert!(merged.is_valid());
    }

    #[test]
    fn test_display_passed() {
        let mut builder = ValidationResultBuilder::new();
        builder.add_info("row_count", 2);
        let text = builder.finalize().to_string();
        assert_eq!(text, "✓ Validation PASSED\n\nInfo:\n  row_count: 2");
    }

    #[test]
    fn test_display_failed() {
        let mut builder = ValidationResultBuilder::new();
        builder.add_error("first");
        builder.add_error("second");
        builder.add_warning("careful");
        let text = builder.finalize().to_string();
        assert_eq!(
            text,
            "✗ Validation FAILED\n\nErrors (2):\n  1. first\n  2. second\n\nWarnings (1):\n  1. careful"
        );
    }

    #[test]
    fn test_serialize_includes_validity() {
        let mut builder = ValidationResultBuilder::new();
        builder.add_error("boom");
        builder.add_info("row_count", 1);
        let json = serde_json::to_value(builder.finalize()).unwrap();
        assert_eq!(
            json,
            json!({
                "is_valid": false,
                "errors": ["boom"],
                "warnings": [],
                "info": {"row_count": 1}
            })
        );
    }
}
