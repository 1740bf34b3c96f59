mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wq_core::SchemaVariant;
use wq_ingest::ReportFormat;

#[derive(Parser)]
#[command(name = "wqv")]
#[command(version, about = "Water quality data validator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV file against a schema variant
    Validate {
        /// Path to the CSV file
        csv: String,

        /// Schema variant: raw, normalized
        #[arg(short, long, default_value = "raw")]
        schema: SchemaVariant,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,

        /// Fail when any warning is reported
        #[arg(long)]
        strict: bool,
    },

    /// Load a raw CSV, normalize it and validate both layouts
    Ingest {
        /// Path to the raw CSV file
        csv: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,

        /// Fail when any warning is reported
        #[arg(long)]
        strict: bool,
    },

    /// Describe a column, or the whole schema when no column is given
    Describe {
        /// Column name
        column: Option<String>,

        /// Schema variant: raw, normalized
        #[arg(short, long, default_value = "raw")]
        schema: SchemaVariant,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },

    /// Check a run configuration without reading data
    Check {
        /// Path to the configuration file (YAML or TOML)
        config: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },

    /// Validate the data named by a run configuration
    Run {
        /// Path to the configuration file (YAML or TOML)
        config: String,

        /// Override the configured output format
        #[arg(short, long)]
        format: Option<ReportFormat>,

        /// Fail when any warning is reported, whatever the configuration says
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Validate {
            csv,
            schema,
            format,
            strict,
        } => commands::validate::execute(&csv, schema, format, strict),

        Commands::Ingest {
            csv,
            format,
            strict,
        } => commands::ingest::execute(&csv, format, strict),

        Commands::Describe {
            column,
            schema,
            format,
        } => commands::describe::execute(column.as_deref(), schema, format),

        Commands::Check { config, format } => commands::check::execute(&config, format),

        Commands::Run {
            config,
            format,
            strict,
        } => commands::run::execute(&config, format, strict),
    }
}
