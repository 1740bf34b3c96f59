use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use tracing::info;
use wq_core::SchemaVariant;
use wq_ingest::{ReportFormat, StationDataLoader};
use wq_validator::DataValidator;

use crate::output;

pub fn execute(csv_path: &str, format: ReportFormat, strict: bool) -> Result<()> {
    if !ingest_file(Path::new(csv_path), format, strict)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Validates the raw table as loaded, runs the loading pipeline, validates the
/// normalized table, and returns whether both passed.
pub fn ingest_file(path: &Path, format: ReportFormat, strict: bool) -> Result<bool> {
    info!("Ingesting {}", path.display());

    let mut loader = StationDataLoader::new(path);
    let raw = loader
        .load()
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    // checked before process() coerces unparseable dates to null
    let raw_result = DataValidator::new(SchemaVariant::Raw).validate_all(raw);

    loader
        .process()
        .with_context(|| format!("Failed to ingest CSV file: {}", path.display()))?;

    let summary = loader.summary()?;
    let normalized_result = loader
        .normalized_table()
        .map(|table| DataValidator::new(SchemaVariant::Normalized).validate_all(table))
        .unwrap_or_default();

    match format {
        ReportFormat::Json => output::print_json(&json!({
            "raw": raw_result,
            "normalized": normalized_result,
            "summary": summary,
        }))?,
        ReportFormat::Text => {
            output::print_success(&format!("Data loaded and normalized from {}", path.display()));
            println!("\nSummary:\n{}", summary);
            output::print_validation_report("raw validation report", &raw_result, format)?;
            output::print_validation_report(
                "normalized validation report",
                &normalized_result,
                format,
            )?;
        }
    }

    Ok(output::passed(&raw_result, strict) && output::passed(&normalized_result, strict))
}
