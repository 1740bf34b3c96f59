use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use wq_ingest::{ReportFormat, parse_file};

use crate::output;

pub fn execute(config_path: &str, format: ReportFormat) -> Result<()> {
    info!("Checking run configuration: {}", config_path);

    let path = Path::new(config_path);
    let config = parse_file(path)
        .with_context(|| format!("Failed to parse configuration file: {}", config_path))?;

    if format == ReportFormat::Json {
        return output::print_json(&serde_json::to_value(&config)?);
    }

    output::print_success("Configuration is valid");

    println!("\nConfiguration Summary:");
    println!("  Source:           {}", config.source.display());
    println!("  Source exists:    {}", if config.source.exists() { "yes" } else { "no" });
    println!("  Schema:           {}", config.schema);
    println!("  Normalize:        {}", config.normalize);
    println!("  Report:           {}", config.report);
    println!("  Fail on warnings: {}", config.fail_on_warnings);

    Ok(())
}
