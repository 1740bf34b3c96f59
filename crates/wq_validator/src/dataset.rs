//! In-memory table representation for validation.
//!
//! A [`DataTable`] is an ordered list of columns plus rows of dynamically typed
//! [`DataValue`]s, the shape a CSV or columnar reader produces.

use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Display format for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value in a table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Timestamp value without time zone
    Timestamp(NaiveDateTime),
}

static NULL: DataValue = DataValue::Null;

impl DataValue {
    /// Returns true for `Null` and for floating point NaN.
    pub fn is_null(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::Bool(_) => "boolean",
            DataValue::Timestamp(_) => "timestamp",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float. NaN is treated as missing.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) if !f.is_nan() => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get this value as a timestamp.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            DataValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Key used for equality in distinct counts and duplicate detection.
    ///
    /// Values of different types never share a key, and all nulls share one.
    pub fn identity_key(&self) -> String {
        if self.is_null() {
            return "null".to_string();
        }
        format!("{}:{}", self.type_name(), self)
    }

    /// Converts this value to JSON for info metrics.
    pub fn to_json(&self) -> Value {
        if self.is_null() {
            return Value::Null;
        }
        match self {
            DataValue::String(s) => Value::from(s.as_str()),
            DataValue::Int(i) => Value::from(*i),
            DataValue::Float(f) => Value::from(*f),
            DataValue::Bool(b) => Value::from(*b),
            DataValue::Timestamp(_) => Value::from(self.to_string()),
            DataValue::Null => Value::Null,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => f.write_str("nan"),
            DataValue::String(s) => f.write_str(s),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(v) if v.is_nan() => f.write_str("nan"),
            // whole numbers keep their fractional part: 1.0, not 1
            DataValue::Float(v) => write!(f, "{:?}", v),
            DataValue::Bool(true) => f.write_str("True"),
            DataValue::Bool(false) => f.write_str("False"),
            DataValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(ts: NaiveDateTime) -> Self {
        DataValue::Timestamp(ts)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DataValue::Null)
    }
}

/// Observed runtime representation of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// Integers without missing values
    Int64,
    /// Floats, or integers mixed with floats or nulls
    Float64,
    /// Booleans
    Bool,
    /// Parsed timestamps
    DateTime,
    /// Text or mixed values
    Object,
}

impl DType {
    /// Returns the dtype label used by the compatibility check.
    pub fn label(self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::DateTime => "datetime64[ns]",
            DType::Object => "object",
        }
    }

    /// Infers the dtype of a column from its values.
    ///
    /// An all-null column reads as `float64`; integers with nulls widen to `float64`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a DataValue>) -> DType {
        let (mut nulls, mut ints, mut floats, mut bools, mut timestamps, mut other) =
            (0usize, 0usize, 0usize, 0usize, 0usize, 0usize);

        for value in values {
            match value {
                v if v.is_null() => nulls += 1,
                DataValue::Int(_) => ints += 1,
                DataValue::Float(_) => floats += 1,
                DataValue::Bool(_) => bools += 1,
                DataValue::Timestamp(_) => timestamps += 1,
                _ => other += 1,
            }
        }

        let non_null = ints + floats + bools + timestamps + other;
        if non_null == 0 {
            return DType::Float64;
        }
        if other > 0 {
            return DType::Object;
        }
        if timestamps == non_null {
            return DType::DateTime;
        }
        if bools == non_null {
            return DType::Bool;
        }
        if ints + floats == non_null {
            if floats == 0 && nulls == 0 {
                return DType::Int64;
            }
            return DType::Float64;
        }
        DType::Object
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single row of data.
pub type DataRow = HashMap<String, DataValue>;

/// A table of rows with an ordered column list.
///
/// A column missing from an individual row reads as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<DataRow>,
}

impl DataTable {
    /// Creates an empty table with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for column in columns {
            table.push_column(column.into());
        }
        table
    }

    /// Creates a table with explicit column order.
    ///
    /// Keys present in rows but not in `columns` are appended in sorted order.
    pub fn with_rows<I, S>(columns: I, rows: Vec<DataRow>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.add_row(row);
        }
        table
    }

    /// Creates a table from rows, with columns in sorted order.
    pub fn from_rows(rows: Vec<DataRow>) -> Self {
        let columns: BTreeSet<String> = rows.iter().flat_map(|r| r.keys().cloned()).collect();
        Self { columns: columns.into_iter().collect(), rows }
    }

    fn push_column(&mut self, column: String) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter()
    }

    /// Gets a specific row by index.
    pub fn get_row(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    /// Adds a row, registering any new columns it introduces.
    pub fn add_row(&mut self, row: DataRow) {
        let mut new_columns: Vec<&String> =
            row.keys().filter(|k| !self.columns.contains(k)).collect();
        new_columns.sort();
        let new_columns: Vec<String> = new_columns.into_iter().cloned().collect();
        self.columns.extend(new_columns);
        self.rows.push(row);
    }

    /// Iterates over the values of one column, nulls included.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a DataValue> {
        self.rows.iter().map(move |row| row.get(column).unwrap_or(&NULL))
    }

    /// Observed dtype of a column, if it exists.
    pub fn dtype(&self, column: &str) -> Option<DType> {
        if !self.has_column(column) {
            return None;
        }
        Some(DType::infer(self.column_values(column)))
    }

    /// Number of null cells in a column.
    pub fn null_count(&self, column: &str) -> usize {
        self.column_values(column).filter(|v| v.is_null()).count()
    }

    /// Replaces every value of a column with `f(value)`.
    pub fn transform_column<F>(&mut self, column: &str, f: F)
    where
        F: Fn(&DataValue) -> DataValue,
    {
        if !self.has_column(column) {
            return;
        }
        for row in &mut self.rows {
            let updated = f(row.get(column).unwrap_or(&NULL));
            row.insert(column.to_string(), updated);
        }
    }

    /// Builds a new table keeping only the mapped columns that are present, renamed.
    ///
    /// Column order follows `mapping`.
    pub fn select_renamed(&self, mapping: &[(&str, &str)]) -> DataTable {
        let kept: Vec<(&str, &str)> = mapping
            .iter()
            .copied()
            .filter(|(from, _)| self.has_column(from))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                kept.iter()
                    .map(|(from, to)| (to.to_string(), row.get(*from).unwrap_or(&NULL).clone()))
                    .collect()
            })
            .collect();

        DataTable {
            columns: kept.iter().map(|(_, to)| to.to_string()).collect(),
            rows,
        }
    }
}

impl FromIterator<DataRow> for DataTable {
    fn from_iter<T: IntoIterator<Item = DataRow>>(iter: T) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

/// Builds a [`DataRow`] from `(column, value)` pairs.
///
/// ```rust
/// use wq_validator::{row, DataValue};
///
/// let r = row([("site_no", DataValue::from("BC08MF0001")), ("value", 1.5.into())]);
/// assert_eq!(r.len(), 2);
/// ```
pub fn row<I, K>(pairs: I) -> DataRow
where
    I: IntoIterator<Item = (K, DataValue)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_data_value_types() {
        assert_eq!(DataValue::Null.type_name(), "null");
        assert_eq!(DataValue::String("test".into()).type_name(), "string");
        assert_eq!(DataValue::Int(42).type_name(), "int64");
        assert_eq!(DataValue::Float(3.5).type_name(), "float64");
        assert_eq!(DataValue::Timestamp(ts(2024, 1, 1)).type_name(), "timestamp");
    }

    #[test]
    fn test_nan_is_null() {
        assert!(DataValue::Float(f64::NAN).is_null());
        assert!(!DataValue::Float(0.0).is_null());
        assert_eq!(DataValue::Float(f64::NAN).as_float(), None);
        assert_eq!(DataValue::Int(3).as_float(), Some(3.0));
    }

    #[test]
    fn test_identity_key_distinguishes_types() {
        assert_ne!(
            DataValue::Int(1).identity_key(),
            DataValue::String("1".into()).identity_key()
        );
        assert_eq!(
            DataValue::Null.identity_key(),
            DataValue::Float(f64::NAN).identity_key()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DataValue::Timestamp(ts(2024, 3, 5)).to_string(), "2024-03-05 00:00:00");
        assert_eq!(DataValue::Bool(true).to_string(), "True");
        assert_eq!(DataValue::Null.to_string(), "nan");
        assert_eq!(DataValue::Float(1.0).to_string(), "1.0");
        assert_eq!(DataValue::Float(2.4).to_string(), "2.4");
        assert_eq!(DataValue::Int(1).to_string(), "1");
    }

    #[test]
    fn test_dtype_inference() {
        let ints = [DataValue::Int(1), DataValue::Int(2)];
        assert_eq!(DType::infer(&ints), DType::Int64);

        let ints_with_null = [DataValue::Int(1), DataValue::Null];
        assert_eq!(DType::infer(&ints_with_null), DType::Float64);

        let mixed_numbers = [DataValue::Int(1), DataValue::Float(2.5)];
        assert_eq!(DType::infer(&mixed_numbers), DType::Float64);

        let strings = [DataValue::from("a"), DataValue::Null];
        assert_eq!(DType::infer(&strings), DType::Object);

        let dates = [DataValue::Timestamp(ts(2020, 1, 1)), DataValue::Null];
        assert_eq!(DType::infer(&dates), DType::DateTime);

        let bools = [DataValue::Bool(true)];
        assert_eq!(DType::infer(&bools), DType::Bool);

        let all_null = [DataValue::Null, DataValue::Null];
        assert_eq!(DType::infer(&all_null), DType::Float64);

        let mixed = [DataValue::Int(1), DataValue::Bool(false)];
        assert_eq!(DType::infer(&mixed), DType::Object);
    }

    #[test]
    fn test_table_operations() {
        let mut table = DataTable::new(["site_no", "value"]);
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 2);

        table.add_row(row([("site_no", DataValue::from("S1"))]));
        table.add_row(row([
            ("site_no", DataValue::from("S2")),
            ("value", DataValue::Float(1.0)),
            ("extra", DataValue::Int(1)),
        ]));

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["site_no", "value", "extra"]);
        assert_eq!(table.null_count("value"), 1);
        assert_eq!(table.null_count("extra"), 1);
        assert_eq!(table.dtype("value"), Some(DType::Float64));
        assert_eq!(table.dtype("missing"), None);
    }

    #[test]
    fn test_from_rows_sorts_columns() {
        let table = DataTable::from_rows(vec![row([
            ("value", DataValue::Float(1.0)),
            ("unit", DataValue::from("MG/L")),
        ])]);
        assert_eq!(table.columns(), ["unit", "value"]);
    }

    #[test]
    fn test_transform_column() {
        let mut table = DataTable::with_rows(
            ["value"],
            vec![row([("value", DataValue::Int(2))]), row([("value", DataValue::Null)])],
        );
        table.transform_column("value", |v| match v.as_float() {
            Some(f) => DataValue::Float(f * 10.0),
            None => DataValue::Null,
        });
        let values: Vec<&DataValue> = table.column_values("value").collect();
        assert_eq!(values, [&DataValue::Float(20.0), &DataValue::Null]);
    }

    #[test]
    fn test_select_renamed() {
        let table = DataTable::with_rows(
            ["sdl", "site_no", "value"],
            vec![row([
                ("sdl", DataValue::Float(0.1)),
                ("site_no", DataValue::from("S1")),
                ("value", DataValue::Float(4.2)),
            ])],
        );
        let renamed = table.select_renamed(&[
            ("site_no", "station_id"),
            ("variable", "parameter"),
            ("value", "value"),
        ]);
        assert_eq!(renamed.columns(), ["station_id", "value"]);
        let first = renamed.get_row(0).unwrap();
        assert_eq!(first.get("station_id"), Some(&DataValue::from("S1")));
        assert!(first.get("sdl").is_none());
    }
}
