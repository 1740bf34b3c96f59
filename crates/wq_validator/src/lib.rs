//! # Water Quality Validator
//!
//! Validation engine for water-quality monitoring records. This crate checks an
//! in-memory table against a schema variant in three passes:
//!
//! - Schema validation (row presence, required and unexpected columns, dtypes)
//! - Quality checks (null shares, value range, timestamp sanity)
//! - Business rules (duplicates, station/parameter cardinality, code sets)
//!
//! ## Example
//!
//! ```rust
//! use wq_validator::{DataTable, DataValue, row, validate_raw_data};
//!
//! let table = DataTable::from_rows(vec![row([
//!     ("site_no", DataValue::from("BC08MF0001")),
//!     ("sample_datetime", DataValue::from("2024-01-15 10:30:00")),
//!     ("variable", DataValue::from("TURBIDITY")),
//!     ("value", DataValue::Float(3.1)),
//!     ("unit", DataValue::from("NTU")),
//! ])]);
//!
//! let result = validate_raw_data(&table);
//! assert!(result.is_valid());
//! ```

mod business;
mod dataset;
mod engine;
mod error;
mod quality;
mod schema;
mod timestamp;

pub use business::*;
pub use dataset::*;
pub use engine::*;
pub use error::*;
pub use quality::*;
pub use schema::*;
pub use timestamp::*;
