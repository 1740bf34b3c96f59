//! Integration tests for reading, loading and configuring station data from disk.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wq_core::SchemaVariant;
use wq_ingest::{
    IngestError, ReportFormat, StationDataLoader, load_station_data, parse_file, read_csv,
};
use wq_validator::{DType, validate_normalized_data, validate_raw_data};

const STATIONS_CSV: &str = "\
site_no,sample_datetime,variable,variable_fr,value,unit,qualifier_flag,sdl,mdl,qa_status
BC08MF0001,2023-05-01 09:00,PH (FIELD),PH (TERRAIN),7.8,PH UNITS,,0.1,0.1,V
BC08MF0001,2023-05-01 09:00,TURBIDITY,TURBIDITE,2.4,NTU,<,0.1,0.1,V
BC08MF0001,2023-06-01 09:00,PH (FIELD),PH (TERRAIN),7.6,PH UNITS,,0.1,0.1,P
BC08NL0005,2023-05-02 11:15,PH (FIELD),PH (TERRAIN),8.1,PH UNITS,,0.1,0.1,V
BC08NL0005,2023-05-02 11:15,PH (FIELD),PH (TERRAIN),8.2,PH UNITS,Z,0.1,0.1,V
";

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_raw_and_normalized_agree() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "stations.csv", STATIONS_CSV);

    let raw = read_csv(&path).unwrap();
    let raw_result = validate_raw_data(&raw);
    assert!(raw_result.is_valid(), "errors: {:?}", raw_result.errors());

    let normalized = load_station_data(&path).unwrap();
    assert_eq!(normalized.dtype("timestamp"), Some(DType::DateTime));
    let normalized_result = validate_normalized_data(&normalized);
    assert!(normalized_result.is_valid());

    for key in ["unique_stations", "unique_parameters", "duplicate_count"] {
        assert_eq!(
            raw_result.info_value(key),
            normalized_result.info_value(key),
            "{key}"
        );
    }
    assert_eq!(normalized_result.info_value("duplicate_count"), Some(&json!(1)));
    assert!(
        normalized_result
            .warnings()
            .contains(&"Unknown qualifier codes found: Z".to_string())
    );
}

#[test]
fn test_parsed_dates_satisfy_raw_schema() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "stations.csv", STATIONS_CSV);

    let mut loader = StationDataLoader::new(&path);
    loader.load().unwrap();
    let before = validate_raw_data(loader.raw_table().unwrap());
    assert!(
        before
            .warnings()
            .contains(&"  - sample_datetime: expected datetime64[ns], got object".to_string())
    );

    loader.parse_dates().unwrap();
    let after = validate_raw_data(loader.raw_table().unwrap());
    assert!(!after.warnings().iter().any(|w| w.contains("sample_datetime")));
}

#[test]
fn test_summary_after_process() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "stations.csv", STATIONS_CSV);

    let mut loader = StationDataLoader::new(&path);
    loader.process().unwrap();
    let summary = loader.summary().unwrap();

    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.unique_stations, 2);
    assert_eq!(summary.unique_parameters, 2);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["date_range"]["min"], json!("2023-05-01T09:00:00"));
    assert_eq!(json["stations"], json!(["BC08MF0001", "BC08NL0005"]));
}

#[test]
fn test_unreadable_sources() {
    let dir = TempDir::new().unwrap();
    let empty = write(&dir, "empty.csv", "");
    assert!(matches!(
        load_station_data(&empty).unwrap_err(),
        IngestError::EmptySource { .. }
    ));

    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        load_station_data(&missing).unwrap_err(),
        IngestError::FileNotFound { .. }
    ));
}

#[test]
fn test_config_file_resolves_source() {
    let dir = TempDir::new().unwrap();
    write(&dir, "stations.csv", STATIONS_CSV);
    let config_path = write(
        &dir,
        "run.yaml",
        "source: stations.csv\nnormalize: true\nreport: json\n",
    );

    let config = parse_file(&config_path).unwrap();
    assert_eq!(config.source, dir.path().join("stations.csv"));
    assert_eq!(config.schema, SchemaVariant::Raw);
    assert_eq!(config.report, ReportFormat::Json);
    assert!(Path::new(&config.source).exists());
}

#[test]
fn test_config_file_toml() {
    let dir = TempDir::new().unwrap();
    let config_path = write(
        &dir,
        "run.toml",
        "source = \"/data/normalized.csv\"\nschema = \"normalized\"\n",
    );
    let config = parse_file(&config_path).unwrap();
    assert_eq!(config.schema, SchemaVariant::Normalized);
    assert_eq!(config.source, Path::new("/data/normalized.csv"));
}
