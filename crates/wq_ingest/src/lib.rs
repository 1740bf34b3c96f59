//! Ingestion for water-quality station data.
//!
//! This crate reads provider CSV files into [`wq_validator::DataTable`]s, runs the
//! raw-to-normalized loading pipeline, and parses run configurations from YAML or
//! TOML.
//!
//! # Example
//!
//! ```no_run
//! use wq_ingest::load_station_data;
//! use wq_validator::validate_normalized_data;
//!
//! let normalized = load_station_data("data/stations.csv")?;
//! let result = validate_normalized_data(&normalized);
//! println!("{}", result);
//! # Ok::<(), wq_ingest::IngestError>(())
//! ```

mod config;
mod error;
mod loader;
mod reader;

pub use config::*;
pub use error::*;
pub use loader::*;
pub use reader::*;
