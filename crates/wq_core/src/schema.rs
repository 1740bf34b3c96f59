//! Schema registry for monitoring records.
//!
//! Two column conventions exist: the raw layout delivered by the data provider and
//! the normalized layout used internally after ingestion. Each is described by a
//! static [`SchemaDefinition`] selected through [`SchemaVariant`].

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Which column convention a table is expected to follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Raw provider format (`site_no`, `sample_datetime`, `variable`, ...)
    #[default]
    Raw,
    /// Internal normalized format (`station_id`, `timestamp`, `parameter`, ...)
    Normalized,
}

impl SchemaVariant {
    /// Returns the static schema definition bound to this variant.
    pub fn definition(self) -> &'static SchemaDefinition {
        match self {
            SchemaVariant::Raw => &RAW_SCHEMA,
            SchemaVariant::Normalized => &NORMALIZED_SCHEMA,
        }
    }

    /// Returns the lowercase label of this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVariant::Raw => "raw",
            SchemaVariant::Normalized => "normalized",
        }
    }

    fn other(self) -> SchemaVariant {
        match self {
            SchemaVariant::Raw => SchemaVariant::Normalized,
            SchemaVariant::Normalized => SchemaVariant::Raw,
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(SchemaVariant::Raw),
            "normalized" | "normalised" => Ok(SchemaVariant::Normalized),
            other => Err(CoreError::UnknownSchemaVariant(other.to_string())),
        }
    }
}

/// Declared semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Free text
    String,
    /// 64-bit floating point measurement
    Float,
    /// Date and time
    Timestamp,
}

impl SemanticType {
    /// Returns the dtype label used by the compatibility check.
    pub fn label(self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Float => "float64",
            SemanticType::Timestamp => "datetime64[ns]",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single column declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name
    pub name: &'static str,
    /// Declared semantic type
    pub semantic_type: SemanticType,
    /// Whether the column must be present
    pub required: bool,
    /// Human-readable description
    pub description: &'static str,
}

impl ColumnSpec {
    const fn required(
        name: &'static str,
        semantic_type: SemanticType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            semantic_type,
            required: true,
            description,
        }
    }

    const fn optional(
        name: &'static str,
        semantic_type: SemanticType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            semantic_type,
            required: false,
            description,
        }
    }
}

/// Names of the columns the quality and business passes inspect.
///
/// The same logical column is addressed by a different name in each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalColumns {
    /// Station identifier
    pub station: &'static str,
    /// Sample date and time
    pub timestamp: &'static str,
    /// Parameter name
    pub parameter: &'static str,
    /// Measured value
    pub value: &'static str,
    /// Qualifier flag
    pub qualifier: &'static str,
}

impl CriticalColumns {
    /// Columns subject to null analysis, in reporting order.
    pub fn null_checked(&self) -> [&'static str; 4] {
        [self.timestamp, self.station, self.parameter, self.value]
    }

    /// Identity key of a reading: timestamp, station, parameter.
    pub fn identity_key(&self) -> [&'static str; 3] {
        [self.timestamp, self.station, self.parameter]
    }
}

/// Static description of one schema variant.
#[derive(Debug)]
pub struct SchemaDefinition {
    /// Variant this definition belongs to
    pub variant: SchemaVariant,
    /// Column declarations, required columns first, in declaration order
    pub columns: &'static [ColumnSpec],
    /// Variant-specific names of the critical columns
    pub critical: CriticalColumns,
}

impl SchemaDefinition {
    /// Required column names in declaration order.
    pub fn required_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name)
            .collect()
    }

    /// Optional column names in declaration order.
    pub fn optional_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| !c.required)
            .map(|c| c.name)
            .collect()
    }

    /// Every column name this variant knows about.
    pub fn all_columns(&self) -> BTreeSet<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Returns true if the column is declared by this variant.
    pub fn is_known(&self, column: &str) -> bool {
        self.column(column).is_some()
    }

    /// Looks up a column declaration by name.
    pub fn column(&self, column: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.name == column)
    }

    /// Declared semantic type of a column, if the column is known.
    pub fn expected_type(&self, column: &str) -> Option<SemanticType> {
        self.column(column).map(|c| c.semantic_type)
    }

    /// Mapping from column name to declared semantic type.
    pub fn expected_types(&self) -> BTreeMap<&'static str, SemanticType> {
        self.columns
            .iter()
            .map(|c| (c.name, c.semantic_type))
            .collect()
    }

    /// Materializes this definition as a serializable summary.
    pub fn info(&self) -> SchemaInfo {
        SchemaInfo {
            variant: self.variant,
            required_columns: self.required_columns(),
            optional_columns: self.optional_columns(),
            all_columns: self.all_columns(),
            expected_types: self.expected_types(),
        }
    }
}

/// Serializable view of a schema definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaInfo {
    /// Variant described
    #[serde(rename = "type")]
    pub variant: SchemaVariant,
    /// Required columns in declaration order
    pub required_columns: Vec<&'static str>,
    /// Optional columns in declaration order
    pub optional_columns: Vec<&'static str>,
    /// All known columns
    pub all_columns: BTreeSet<&'static str>,
    /// Declared type per column
    pub expected_types: BTreeMap<&'static str, SemanticType>,
}

/// Returns the schema summary for a variant.
pub fn schema_info(variant: SchemaVariant) -> SchemaInfo {
    variant.definition().info()
}

static RAW_COLUMNS: [ColumnSpec; 12] = [
    ColumnSpec::required("site_no", SemanticType::String, "Station/site identifier code"),
    ColumnSpec::required(
        "sample_datetime",
        SemanticType::Timestamp,
        "Timestamp of sample collection",
    ),
    ColumnSpec::required("value", SemanticType::Float, "Numeric measurement value"),
    ColumnSpec::required("variable", SemanticType::String, "Water quality parameter name"),
    ColumnSpec::required(
        "unit",
        SemanticType::String,
        "Unit of measurement (e.g., MG/L, DEG C, NTU)",
    ),
    ColumnSpec::optional("qualifier_flag", SemanticType::String, "Data quality qualifier"),
    ColumnSpec::optional("sdl", SemanticType::Float, "Sample detection limit"),
    ColumnSpec::optional("mdl", SemanticType::Float, "Method detection limit"),
    ColumnSpec::optional(
        "variable_code",
        SemanticType::String,
        "Numeric code for the parameter",
    ),
    ColumnSpec::optional(
        "variable_fr",
        SemanticType::String,
        "French translation of parameter name",
    ),
    ColumnSpec::optional(
        "qa_status",
        SemanticType::String,
        "Quality assurance status code (P=Provisional, V=Validated)",
    ),
    ColumnSpec::optional("sample_id", SemanticType::String, "Unique identifier for the sample"),
];

static NORMALIZED_COLUMNS: [ColumnSpec; 8] = [
    ColumnSpec::required(
        "station_id",
        SemanticType::String,
        "Unique identifier for the monitoring station",
    ),
    ColumnSpec::required(
        "timestamp",
        SemanticType::Timestamp,
        "Date and time of sample collection",
    ),
    ColumnSpec::required(
        "parameter",
        SemanticType::String,
        "Name of the water quality parameter being measured",
    ),
    ColumnSpec::required("value", SemanticType::Float, "Numeric measurement value"),
    ColumnSpec::required(
        "unit",
        SemanticType::String,
        "Unit of measurement (e.g., MG/L, DEG C, NTU)",
    ),
    ColumnSpec::optional(
        "qualifier",
        SemanticType::String,
        "Data qualifier flag (e.g., < for below detection limit)",
    ),
    ColumnSpec::optional(
        "qa_status",
        SemanticType::String,
        "Quality assurance status code (P=Provisional, V=Validated)",
    ),
    ColumnSpec::optional("sample_id", SemanticType::String, "Unique identifier for the sample"),
];

static RAW_SCHEMA: SchemaDefinition = SchemaDefinition {
    variant: SchemaVariant::Raw,
    columns: &RAW_COLUMNS,
    critical: CriticalColumns {
        station: "site_no",
        timestamp: "sample_datetime",
        parameter: "variable",
        value: "value",
        qualifier: "qualifier_flag",
    },
};

static NORMALIZED_SCHEMA: SchemaDefinition = SchemaDefinition {
    variant: SchemaVariant::Normalized,
    columns: &NORMALIZED_COLUMNS,
    critical: CriticalColumns {
        station: "station_id",
        timestamp: "timestamp",
        parameter: "parameter",
        value: "value",
        qualifier: "qualifier",
    },
};

/// Raw → normalized column names. Raw columns not listed here are dropped by
/// normalization.
pub static COLUMN_MAPPING: [(&str, &str); 8] = [
    ("site_no", "station_id"),
    ("sample_datetime", "timestamp"),
    ("variable", "parameter"),
    ("value", "value"),
    ("unit", "unit"),
    ("qualifier_flag", "qualifier"),
    ("qa_status", "qa_status"),
    ("sample_id", "sample_id"),
];

/// Raw → normalized mapping as a lookup table.
pub fn column_mapping() -> BTreeMap<&'static str, &'static str> {
    COLUMN_MAPPING.iter().copied().collect()
}

/// Normalized → raw mapping as a lookup table.
pub fn reverse_column_mapping() -> BTreeMap<&'static str, &'static str> {
    COLUMN_MAPPING.iter().map(|&(raw, norm)| (norm, raw)).collect()
}

/// Translates a column name from one variant to another.
///
/// Translating to the same variant returns the name unchanged when it is known.
pub fn map_column(column: &str, from: SchemaVariant, to: SchemaVariant) -> Result<&'static str> {
    let unmapped = || CoreError::UnmappedColumn {
        column: column.to_string(),
        target: to.to_string(),
    };

    match (from, to) {
        (SchemaVariant::Raw, SchemaVariant::Normalized) => COLUMN_MAPPING
            .iter()
            .find(|(raw, _)| *raw == column)
            .map(|(_, norm)| *norm)
            .ok_or_else(unmapped),
        (SchemaVariant::Normalized, SchemaVariant::Raw) => COLUMN_MAPPING
            .iter()
            .find(|(_, norm)| *norm == column)
            .map(|(raw, _)| *raw)
            .ok_or_else(unmapped),
        _ => from
            .definition()
            .column(column)
            .map(|c| c.name)
            .ok_or_else(unmapped),
    }
}

/// Returns a human description of a column, or `"Column: <name>"` when the name is
/// not declared by either variant.
pub fn column_description(column: &str, variant: SchemaVariant) -> String {
    variant
        .definition()
        .column(column)
        .or_else(|| variant.other().definition().column(column))
        .map(|c| c.description.to_string())
        .unwrap_or_else(|| format!("Column: {}", column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_required_columns_in_declaration_order() {
        assert_eq!(
            SchemaVariant::Raw.definition().required_columns(),
            vec!["site_no", "sample_datetime", "value", "variable", "unit"]
        );
        assert_eq!(
            SchemaVariant::Normalized.definition().required_columns(),
            vec!["station_id", "timestamp", "parameter", "value", "unit"]
        );
    }

    #[test]
    fn test_all_columns_cover_required_and_optional() {
        for variant in [SchemaVariant::Raw, SchemaVariant::Normalized] {
            let schema = variant.definition();
            let all = schema.all_columns();
            assert_eq!(
                all.len(),
                schema.required_columns().len() + schema.optional_columns().len()
            );
            assert_eq!(schema.expected_types().len(), all.len());
        }
    }

    #[test]
    fn test_expected_types() {
        let raw = SchemaVariant::Raw.definition();
        assert_eq!(raw.expected_type("sdl"), Some(SemanticType::Float));
        assert_eq!(
            raw.expected_type("sample_datetime"),
            Some(SemanticType::Timestamp)
        );
        assert_eq!(raw.expected_type("station_id"), None);

        let norm = SchemaVariant::Normalized.definition();
        assert_eq!(norm.expected_type("timestamp"), Some(SemanticType::Timestamp));
        assert_eq!(SemanticType::Timestamp.label(), "datetime64[ns]");
    }

    #[test]
    fn test_mapping_is_total_on_mapped_raw_columns_and_invertible() {
        let forward = column_mapping();
        let reverse = reverse_column_mapping();
        assert_eq!(forward.len(), reverse.len());

        let raw = SchemaVariant::Raw.definition();
        let norm = SchemaVariant::Normalized.definition();
        for (raw_name, norm_name) in &forward {
            assert!(raw.is_known(raw_name));
            assert!(norm.is_known(norm_name));
            assert_eq!(reverse.get(norm_name), Some(raw_name));
        }

        // every normalized column has a raw origin
        for column in norm.all_columns() {
            assert!(reverse.contains_key(column), "{} unmapped", column);
        }
    }

    #[test]
    fn test_critical_columns_map_onto_each_other() {
        let raw = SchemaVariant::Raw.definition().critical;
        let norm = SchemaVariant::Normalized.definition().critical;
        for (r, n) in raw.null_checked().iter().zip(norm.null_checked().iter()) {
            assert_eq!(
                map_column(r, SchemaVariant::Raw, SchemaVariant::Normalized).unwrap(),
                *n
            );
        }
        assert_eq!(
            map_column(raw.qualifier, SchemaVariant::Raw, SchemaVariant::Normalized).unwrap(),
            norm.qualifier
        );
    }

    #[test]
    fn test_map_column_unmapped() {
        let err = map_column("sdl", SchemaVariant::Raw, SchemaVariant::Normalized).unwrap_err();
        assert_eq!(
            err,
            CoreError::UnmappedColumn {
                column: "sdl".to_string(),
                target: "normalized".to_string()
            }
        );
        assert_eq!(
            map_column("station_id", SchemaVariant::Normalized, SchemaVariant::Raw).unwrap(),
            "site_no"
        );
        assert!(map_column("nope", SchemaVariant::Raw, SchemaVariant::Raw).is_err());
    }

    #[test]
    fn test_column_description() {
        assert_eq!(
            column_description("station_id", SchemaVariant::Normalized),
            "Unique identifier for the monitoring station"
        );
        // raw-only names resolve regardless of the variant asked for
        assert_eq!(
            column_description("sdl", SchemaVariant::Normalized),
            "Sample detection limit"
        );
        assert_eq!(
            column_description("turbidity", SchemaVariant::Raw),
            "Column: turbidity"
        );
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("raw".parse::<SchemaVariant>(), Ok(SchemaVariant::Raw));
        assert_eq!(
            " Normalized ".parse::<SchemaVariant>(),
            Ok(SchemaVariant::Normalized)
        );
        assert_eq!(
            "wide".parse::<SchemaVariant>(),
            Err(CoreError::UnknownSchemaVariant("wide".to_string()))
        );
        assert_eq!(SchemaVariant::Normalized.to_string(), "normalized");
    }

    #[test]
    fn test_schema_info_serializes() {
        let info = schema_info(SchemaVariant::Normalized);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "normalized");
        assert_eq!(json["expected_types"]["value"], "float");
        assert_eq!(json["required_columns"][0], "station_id");
    }
}
