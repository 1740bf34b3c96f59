//! Run configuration in YAML or TOML.
//!
//! A configuration names the CSV to validate and how to validate and report it.
//!
//! ```rust
//! use wq_ingest::{IngestConfig, ReportFormat, parse_yaml};
//! use wq_core::SchemaVariant;
//!
//! let config = parse_yaml(r#"
//! source: data/stations.csv
//! schema: normalized
//! report: json
//! "#).unwrap();
//!
//! assert_eq!(config.schema, SchemaVariant::Normalized);
//! assert_eq!(config.report, ReportFormat::Json);
//! assert!(!config.fail_on_warnings);
//! ```

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use wq_core::SchemaVariant;

/// How a validation report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}' (expected text or json)")),
        }
    }
}

/// Settings for one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// CSV file to validate
    pub source: PathBuf,

    /// Column convention the source follows
    #[serde(default)]
    pub schema: SchemaVariant,

    /// Run the raw source through the loader and validate the normalized table too
    #[serde(default)]
    pub normalize: bool,

    #[serde(default)]
    pub report: ReportFormat,

    /// Treat any warning as a failed run
    #[serde(default)]
    pub fail_on_warnings: bool,
}

impl IngestConfig {
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    /// Resolves a relative source against the directory of the config file.
    pub fn resolve_source(&mut self, config_path: &Path) {
        if let Some(dir) = config_path.parent().filter(|_| self.source.is_relative()) {
            self.source = dir.join(&self.source);
        }
    }

    fn check(self) -> Result<Self> {
        if self.source.as_os_str().is_empty() {
            return Err(IngestError::Config("source must not be empty".to_string()));
        }
        if self.normalize && self.schema == SchemaVariant::Normalized {
            return Err(IngestError::Config(
                "normalize requires a raw source schema".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Builder for an [`IngestConfig`].
///
/// ```rust
/// use wq_ingest::{IngestConfig, ReportFormat};
///
/// let config = IngestConfig::builder()
///     .source("data/stations.csv")
///     .report(ReportFormat::Json)
///     .fail_on_warnings(true)
///     .build()
///     .unwrap();
/// assert!(config.fail_on_warnings);
/// ```
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    source: Option<PathBuf>,
    schema: SchemaVariant,
    normalize: bool,
    report: ReportFormat,
    fail_on_warnings: bool,
}

impl IngestConfigBuilder {
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn schema(mut self, schema: SchemaVariant) -> Self {
        self.schema = schema;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn report(mut self, report: ReportFormat) -> Self {
        self.report = report;
        self
    }

    pub fn fail_on_warnings(mut self, fail_on_warnings: bool) -> Self {
        self.fail_on_warnings = fail_on_warnings;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] when no source is set or the settings conflict.
    pub fn build(self) -> Result<IngestConfig> {
        let source = self
            .source
            .ok_or_else(|| IngestError::Config("source is required".to_string()))?;

        IngestConfig {
            source,
            schema: self.schema,
            normalize: self.normalize,
            report: self.report,
            fail_on_warnings: self.fail_on_warnings,
        }
        .check()
    }
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a configuration from a YAML string.
pub fn parse_yaml(content: &str) -> Result<IngestConfig> {
    let config: IngestConfig = serde_yaml_ng::from_str(content)?;
    config.check()
}

/// Parse a configuration from a TOML string.
pub fn parse_toml(content: &str) -> Result<IngestConfig> {
    let config: IngestConfig =
        toml::from_str(content).map_err(|e| IngestError::Toml(e.to_string()))?;
    config.check()
}

/// Detect the configuration format from a file path based on its extension.
///
/// # Errors
///
/// Returns `IngestError::InvalidExtension` if the file has no extension.
/// Returns `IngestError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(IngestError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ConfigFormat::Yaml),
        "toml" => Ok(ConfigFormat::Toml),
        other => Err(IngestError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a configuration file with automatic format detection.
///
/// A relative `source` is resolved against the file's directory.
pub fn parse_file(path: &Path) -> Result<IngestConfig> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config = match format {
        ConfigFormat::Yaml => parse_yaml(&content)?,
        ConfigFormat::Toml => parse_toml(&content)?,
    };
    config.resolve_source(path);
    Ok(config)
}
