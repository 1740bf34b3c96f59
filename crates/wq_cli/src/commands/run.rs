use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use wq_ingest::{ReportFormat, parse_file};

use super::{ingest, validate};

pub fn execute(config_path: &str, format: Option<ReportFormat>, strict: bool) -> Result<()> {
    let path = Path::new(config_path);
    let mut config = parse_file(path)
        .with_context(|| format!("Failed to parse configuration file: {}", config_path))?;

    // Flags win over file values
    if let Some(format) = format {
        config.report = format;
    }
    config.fail_on_warnings |= strict;

    info!(
        "Running {} validation of {} (normalize: {})",
        config.schema,
        config.source.display(),
        config.normalize
    );

    let passed = if config.normalize {
        ingest::ingest_file(&config.source, config.report, config.fail_on_warnings)?
    } else {
        validate::validate_file(
            &config.source,
            config.schema,
            config.report,
            config.fail_on_warnings,
        )?
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
