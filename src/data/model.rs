use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawUpload – bytes handed over by the upload widget
// ---------------------------------------------------------------------------

/// An unparsed user-submitted file: raw bytes plus the name it was uploaded
/// under. Owned by the upload collaborator and passed by reference into
/// [`crate::data::loader::ingest`]; discarded once parsing is done.
#[derive(Debug, Clone)]
pub struct RawUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RawUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        RawUpload {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased filename extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the closed set of inferred cell types
// ---------------------------------------------------------------------------

/// Inferred type of a column. Inference tries the variants in declaration
/// order (most specific first); `String` is the fallback that accepts
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Date,
    String,
}

impl ColumnType {
    /// Whether values of this type feed numeric summary statistics.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::String => "string",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed sequence of raw cell values
// ---------------------------------------------------------------------------

/// A single column: unique name, inferred type, and the raw string values in
/// row order. `None` is the null marker for cells that were missing or (in
/// non-strict mode) failed to parse as the inferred type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<Option<String>>,
}

impl Column {
    /// Number of cells (equals the dataset row count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// The cell at `row` (0-based), `None` when null or out of range.
    pub fn value(&self, row: usize) -> Option<&str> {
        self.values.get(row).and_then(|v| v.as_deref())
    }

    /// Interpret the cell at `row` as an `f64`. Only integer and float
    /// columns yield values; everything else maps to `None`.
    pub fn numeric_value(&self, row: usize) -> Option<f64> {
        if !self.ty.is_numeric() {
            return None;
        }
        self.value(row).and_then(|v| v.trim().parse::<f64>().ok())
    }

    /// Sorted set of distinct cell values, nulls included.
    pub fn unique_values(&self) -> BTreeSet<Option<String>> {
        self.values.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the validated columnar table
// ---------------------------------------------------------------------------

/// The validated, typed columnar form of an upload.
///
/// Invariants, enforced by the loader: every column has the same length, and
/// column names are unique and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    /// Number of data rows (zero for a dataset without columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// First `n` rows in row-major order, for table previews.
    pub fn preview(&self, n: usize) -> Vec<Vec<Option<&str>>> {
        let rows = self.row_count().min(n);
        (0..rows)
            .map(|r| self.columns.iter().map(|c| c.value(r)).collect())
            .collect()
    }

    /// Materialize a new dataset containing only the given rows (0-based),
    /// in the order given. Out-of-range indices are skipped.
    pub fn take_rows(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                ty: c.ty,
                values: rows
                    .iter()
                    .filter_map(|&r| c.values.get(r).cloned())
                    .collect(),
            })
            .collect();
        Dataset { columns }
    }
}
