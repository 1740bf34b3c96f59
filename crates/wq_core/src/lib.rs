//! # Water Quality Core
//!
//! Core data structures for validating environmental-monitoring records.
//!
//! This crate holds the read-only inputs every validation pass consults, plus the
//! result type those passes produce:
//!
//! - **Schema Registry**: required/optional columns, declared semantic types and the
//!   raw ↔ normalized column mapping, per [`SchemaVariant`]
//! - **Constraint Catalog**: value bounds, year bounds, string length bounds and the
//!   valid qualifier / QA status codes
//! - **Validation Result**: an accumulator of errors, warnings and informational
//!   metrics, built with [`ValidationResultBuilder`] and frozen by `finalize()`
//!
//! ## Example
//!
//! ```rust
//! use wq_core::{SchemaVariant, ValidationResultBuilder, column_description};
//!
//! let schema = SchemaVariant::Raw.definition();
//! assert!(schema.required_columns().contains(&"site_no"));
//!
//! let mut builder = ValidationResultBuilder::new();
//! builder.add_warning("1 duplicate records found");
//! let result = builder.finalize();
//! assert!(result.is_valid());
//!
//! assert_eq!(column_description("mystery", SchemaVariant::Raw), "Column: mystery");
//! ```

pub mod constraints;
pub mod error;
pub mod result;
pub mod schema;

pub use constraints::*;
pub use error::*;
pub use result::*;
pub use schema::*;
