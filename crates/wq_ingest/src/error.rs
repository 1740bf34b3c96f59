//! Error types for station data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, loading or configuring ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file does not exist.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Source file exists but could not be read.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// Malformed CSV content.
    #[error("failed to parse CSV {origin}: {source}")]
    CsvParse {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// Source has a header but no data rows, or nothing at all.
    #[error("CSV source is empty: {origin}")]
    EmptySource { origin: String },

    // === Pipeline Errors ===
    /// A loader step was called before the step it depends on.
    #[error("Must call {prerequisite}() before {operation}()")]
    NotLoaded {
        operation: &'static str,
        prerequisite: &'static str,
    },

    /// The raw table failed schema validation.
    #[error("Schema validation failed:\n{}", .errors.join("\n"))]
    SchemaValidation { errors: Vec<String> },

    // === Configuration Errors ===
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    Toml(String),

    /// Unsupported configuration file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or missing configuration file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Configuration is incomplete or inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl IngestError {
    /// Returns true for caller-misuse errors, as opposed to data or I/O problems.
    pub fn is_state_error(&self) -> bool {
        matches!(self, IngestError::NotLoaded { .. })
    }
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
