//! Error types for the schema registry.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type for core operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Schema variant label is neither `raw` nor `normalized`
    #[error("Unknown schema variant '{0}': expected 'raw' or 'normalized'")]
    UnknownSchemaVariant(String),

    /// Column has no counterpart in the other schema variant
    #[error("Column '{column}' has no {target} counterpart")]
    UnmappedColumn {
        /// Column name that could not be mapped
        column: String,
        /// Variant the mapping was requested for
        target: String,
    },
}
