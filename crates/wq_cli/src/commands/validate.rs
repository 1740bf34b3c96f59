use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use wq_core::SchemaVariant;
use wq_ingest::{ReportFormat, read_csv};
use wq_validator::DataValidator;

use crate::output;

pub fn execute(csv_path: &str, schema: SchemaVariant, format: ReportFormat, strict: bool) -> Result<()> {
    if !validate_file(Path::new(csv_path), schema, format, strict)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Reads and validates one CSV, prints the report, and returns whether it passed.
pub fn validate_file(
    path: &Path,
    schema: SchemaVariant,
    format: ReportFormat,
    strict: bool,
) -> Result<bool> {
    info!("Validating {} as {} data", path.display(), schema);
    info!("Strict mode: {}", strict);

    let table = read_csv(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

    if format == ReportFormat::Text {
        output::print_info(&format!(
            "Loaded {} rows, {} columns from {}",
            table.len(),
            table.column_count(),
            path.display()
        ));
    }

    let result = DataValidator::new(schema).validate_all(&table);
    output::print_validation_report(&format!("{} validation report", schema), &result, format)?;

    Ok(output::passed(&result, strict))
}
