//! Station data loading pipeline.
//!
//! [`StationDataLoader`] walks a raw provider CSV through four steps: load,
//! schema validation, date parsing and column normalization. Each step checks
//! that the one it depends on has run and reports [`IngestError::NotLoaded`]
//! otherwise.

use crate::error::{IngestError, Result};
use crate::reader::read_csv;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wq_core::{COLUMN_MAPPING, SchemaVariant, ValidationResult};
use wq_validator::{DataTable, DataValidator, DataValue, coerce_timestamp};

/// Raw column holding the sample time.
const RAW_DATETIME_COLUMN: &str = "sample_datetime";

/// Earliest and latest normalized timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

/// Overview of a normalized table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderSummary {
    pub total_rows: usize,
    pub date_range: Option<DateRange>,
    pub unique_stations: usize,
    pub unique_parameters: usize,
    pub parameters: Vec<String>,
    pub stations: Vec<String>,
}

impl LoaderSummary {
    fn from_table(table: &DataTable) -> Self {
        let timestamps: Vec<NaiveDateTime> = table
            .column_values("timestamp")
            .filter_map(DataValue::as_timestamp)
            .collect();
        let date_range = timestamps
            .iter()
            .min()
            .zip(timestamps.iter().max())
            .map(|(min, max)| DateRange {
                min: *min,
                max: *max,
            });

        let parameters = sorted_distinct(table, "parameter");
        let stations = sorted_distinct(table, "station_id");

        Self {
            total_rows: table.len(),
            date_range,
            unique_stations: stations.len(),
            unique_parameters: parameters.len(),
            parameters,
            stations,
        }
    }
}

impl fmt::Display for LoaderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  total_rows: {}", self.total_rows)?;
        match &self.date_range {
            Some(range) => writeln!(f, "  date_range: {} to {}", range.min, range.max)?,
            None => writeln!(f, "  date_range: none")?,
        }
        writeln!(f, "  unique_stations: {}", self.unique_stations)?;
        writeln!(f, "  unique_parameters: {}", self.unique_parameters)?;
        writeln!(f, "  parameters: {}", self.parameters.join(", "))?;
        write!(f, "  stations: {}", self.stations.join(", "))
    }
}

fn sorted_distinct(table: &DataTable, column: &str) -> Vec<String> {
    table
        .column_values(column)
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Loads a raw station CSV and turns it into a normalized table.
///
/// # Example
///
/// ```no_run
/// use wq_ingest::StationDataLoader;
///
/// let mut loader = StationDataLoader::new("data/stations.csv");
/// let normalized = loader.process()?;
/// println!("{} rows", normalized.len());
/// println!("{}", loader.summary()?);
/// # Ok::<(), wq_ingest::IngestError>(())
/// ```
pub struct StationDataLoader {
    path: PathBuf,
    raw: Option<DataTable>,
    normalized: Option<DataTable>,
    validator: DataValidator,
    validation_result: Option<ValidationResult>,
}

impl StationDataLoader {
    /// Creates a loader for the CSV at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            raw: None,
            normalized: None,
            validator: DataValidator::new(SchemaVariant::Raw),
            validation_result: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn raw_table(&self) -> Option<&DataTable> {
        self.raw.as_ref()
    }

    pub fn normalized_table(&self) -> Option<&DataTable> {
        self.normalized.as_ref()
    }

    /// Result of the most recent [`validate_schema`](Self::validate_schema) call.
    pub fn validation_result(&self) -> Option<&ValidationResult> {
        self.validation_result.as_ref()
    }

    /// Consumes the loader, returning the normalized table if one was built.
    pub fn into_normalized(self) -> Option<DataTable> {
        self.normalized
    }

    /// Reads the CSV into the raw table.
    pub fn load(&mut self) -> Result<&DataTable> {
        if !self.path.exists() {
            return Err(IngestError::FileNotFound {
                path: self.path.clone(),
            });
        }

        let table = read_csv(&self.path)?;
        if table.is_empty() {
            return Err(IngestError::EmptySource {
                origin: self.path.display().to_string(),
            });
        }

        info!(
            path = %self.path.display(),
            rows = table.len(),
            columns = table.column_count(),
            "Loaded raw station data"
        );
        Ok(&*self.raw.insert(table))
    }

    /// Checks the raw table against the raw schema.
    pub fn validate_schema(&mut self) -> Result<&ValidationResult> {
        let raw = self.raw.as_ref().ok_or(IngestError::NotLoaded {
            operation: "validate_schema",
            prerequisite: "load",
        })?;

        let result = self.validator.validate_schema(raw);
        Ok(&*self.validation_result.insert(result))
    }

    /// Coerces the raw sample time column to timestamps.
    ///
    /// Unparseable values become null and are logged, never rejected.
    pub fn parse_dates(&mut self) -> Result<&DataTable> {
        let raw = self.raw.as_mut().ok_or(IngestError::NotLoaded {
            operation: "parse_dates",
            prerequisite: "load",
        })?;

        let nulls_before = raw.null_count(RAW_DATETIME_COLUMN);
        raw.transform_column(RAW_DATETIME_COLUMN, |value| {
            coerce_timestamp(value).into()
        });
        let unparsed = raw.null_count(RAW_DATETIME_COLUMN) - nulls_before;

        if unparsed > 0 {
            warn!("{} datetime values could not be parsed", unparsed);
        }
        Ok(&*raw)
    }

    /// Keeps the mapped raw columns and renames them to the normalized layout.
    pub fn normalize_columns(&mut self) -> Result<&DataTable> {
        let raw = self.raw.as_ref().ok_or(IngestError::NotLoaded {
            operation: "normalize_columns",
            prerequisite: "load",
        })?;

        let normalized = raw.select_renamed(&COLUMN_MAPPING);
        Ok(&*self.normalized.insert(normalized))
    }

    /// Runs load, schema validation, date parsing and normalization.
    ///
    /// A table already read by [`load`](Self::load) is reused as-is, so callers can
    /// inspect the raw table before its dates are coerced.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::SchemaValidation`] with every schema error when the
    /// raw table does not satisfy the raw schema.
    pub fn process(&mut self) -> Result<&DataTable> {
        if self.raw.is_none() {
            self.load()?;
        }

        let validation = self.validate_schema()?;
        if !validation.is_valid() {
            return Err(IngestError::SchemaValidation {
                errors: validation.errors().to_vec(),
            });
        }

        self.parse_dates()?;
        self.normalize_columns()
    }

    /// Summarizes the normalized table.
    pub fn summary(&self) -> Result<LoaderSummary> {
        let normalized = self.normalized.as_ref().ok_or(IngestError::NotLoaded {
            operation: "summary",
            prerequisite: "process",
        })?;
        Ok(LoaderSummary::from_table(normalized))
    }
}

/// Loads, validates and normalizes a raw station CSV in one call.
pub fn load_station_data(path: impl AsRef<Path>) -> Result<DataTable> {
    let mut loader = StationDataLoader::new(path.as_ref());
    loader.process()?;
    loader.into_normalized().ok_or(IngestError::NotLoaded {
        operation: "load_station_data",
        prerequisite: "process",
    })
}
