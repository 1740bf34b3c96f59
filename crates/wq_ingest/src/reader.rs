//! CSV reading into a [`DataTable`].
//!
//! Cells are typed per column, not per cell: a column whose non-missing cells all
//! parse as integers becomes `Int`, otherwise all floats becomes `Float`, otherwise
//! all `true`/`false` becomes `Bool`, and anything else keeps every cell as text.
//! Dates are left as text; the loader coerces them explicitly.

use crate::error::{IngestError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use wq_validator::{DataRow, DataTable, DataValue};

/// Cell contents read as missing, besides empty cells.
pub const NA_TOKENS: [&str; 9] = [
    "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Reads a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<DataTable> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    read_table(file, &path.display().to_string())
}

/// Reads CSV content with a header row from any byte source.
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<DataTable> {
    read_table(reader, "<reader>")
}

fn read_table<R: Read>(source: R, origin: &str) -> Result<DataTable> {
    let csv_error = |source| IngestError::CsvParse {
        origin: origin.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let columns = column_names(&headers);
    if columns.is_empty() {
        return Err(IngestError::EmptySource {
            origin: origin.to_string(),
        });
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); columns.len()];
    let mut row_count = 0usize;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        for (idx, column_cells) in cells.iter_mut().enumerate() {
            let cell = record.get(idx).filter(|raw| !is_missing(raw));
            column_cells.push(cell.map(str::to_string));
        }
        row_count += 1;
    }

    let mut rows: Vec<DataRow> = vec![DataRow::with_capacity(columns.len()); row_count];
    for (column, column_cells) in columns.iter().zip(cells) {
        for (row, value) in rows.iter_mut().zip(type_column(column_cells)) {
            row.insert(column.clone(), value);
        }
    }

    debug!(
        origin,
        rows = row_count,
        columns = columns.len(),
        "Read CSV table"
    );
    Ok(DataTable::with_rows(columns, rows))
}

/// Header names with the BOM stripped, blanks named by position and repeats
/// suffixed `.1`, `.2`, ...
fn column_names(headers: &csv::StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let header = header.trim_matches('\u{feff}');
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn type_column(cells: Vec<Option<String>>) -> Vec<DataValue> {
    let present = || cells.iter().flatten();

    if present().all(|raw| raw.trim().parse::<i64>().is_ok()) {
        return cells
            .iter()
            .map(|cell| cell.as_ref().and_then(|raw| raw.trim().parse::<i64>().ok()).into())
            .collect();
    }

    if present().all(|raw| raw.trim().parse::<f64>().is_ok()) {
        return cells
            .iter()
            .map(|cell| cell.as_ref().and_then(|raw| raw.trim().parse::<f64>().ok()).into())
            .collect();
    }

    if present().all(|raw| parse_bool(raw).is_some()) {
        return cells
            .iter()
            .map(|cell| cell.as_deref().and_then(parse_bool).into())
            .collect();
    }

    cells.into_iter().map(DataValue::from).collect()
}
