use thiserror::Error;

use crate::data::model::ColumnType;

// ---------------------------------------------------------------------------
// Ingestion error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can make an ingestion fail, with enough coordinates for
/// the caller to point the user at the offending row or column.
///
/// Row numbers are 1-based over data rows; the header row is not counted.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload contained no rows at all, not even a header.
    #[error("input contains no rows")]
    EmptyInput,

    /// Two columns resolved to the same name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumnName { name: String },

    /// Strict mode: a row's field count differs from the header's.
    #[error("row {row}: expected {expected} fields, found {actual}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Strict mode: a cell does not parse as its column's inferred type.
    #[error("row {row}, column '{column}': '{value}' is not a valid {expected}")]
    UnparsableCell {
        row: usize,
        column: String,
        value: String,
        expected: ColumnType,
    },

    /// Strict mode: the input holds more data rows than `max_rows` allows.
    #[error("input exceeds the row limit of {limit}")]
    TooManyRows { limit: usize },

    /// The CSV reader itself gave up mid-record.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON payload does not parse at all.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON payload parses but is not an array of flat objects.
    #[error("unsupported JSON shape: {0}")]
    JsonShape(String),

    /// The upload's filename extension maps to no supported format.
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}
