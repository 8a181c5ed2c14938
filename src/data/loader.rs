//! Upload ingestion: format dispatch, type inference, validation, statistics.

use std::collections::BTreeSet;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::IngestError;

use super::infer::{self, TypeCandidate};
use super::model::{Column, ColumnType, Dataset, RawUpload};
use super::report::{ColumnCounts, DroppedRow, MalformedCell, ValidationReport};
use super::stats::SummaryStats;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Knobs for a single ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Treat the first row as column names (default). When false, columns
    /// are named `col_1`, `col_2`, ... by position.
    pub has_header: bool,
    /// Field separator byte for delimited text.
    pub delimiter: u8,
    /// Upper bound on data rows. Non-strict runs stop reading at the limit
    /// and mark the report truncated; strict runs fail.
    pub max_rows: Option<usize>,
    /// Fail on the first problem instead of repairing and reporting it.
    pub strict: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            has_header: true,
            delimiter: b',',
            max_rows: None,
            strict: false,
        }
    }
}

/// Everything one upload produces: the typed dataset, the record of what
/// validation rejected or coerced, and per-column statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingested {
    pub dataset: Dataset,
    pub report: ValidationReport,
    pub stats: SummaryStats,
}

/// Ingest an upload end to end.  Dispatch by filename extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – delimited text with RFC 4180 quoting
/// * `.json`         – `[{ "col": value, ... }, ...]` (records orientation)
///
/// Uploads without an extension are read as CSV.
pub fn ingest(raw: &RawUpload, options: &IngestOptions) -> Result<Ingested, IngestError> {
    let table = match raw.extension() {
        None => read_csv(&raw.bytes, options)?,
        Some(ext) => match ext.as_str() {
            "csv" | "txt" => read_csv(&raw.bytes, options)?,
            "json" => read_json(&raw.bytes, options)?,
            other => return Err(IngestError::UnsupportedFormat(other.to_string())),
        },
    };
    let ingested = type_and_validate(table, options)?;
    info!("ingested '{}': {}", raw.filename, ingested.report.summary());
    Ok(ingested)
}

// ---------------------------------------------------------------------------
// Raw table – format front-ends produce this, typing consumes it
// ---------------------------------------------------------------------------

/// Untyped rectangular payload shared by the CSV and JSON front-ends.
/// Every kept row has exactly `headers.len()` cells.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Original 1-based data row number of each kept row, so report
    /// coordinates survive dropped rows.
    row_numbers: Vec<usize>,
    dropped: Vec<DroppedRow>,
    rows_read: usize,
    truncated: bool,
}

impl RawTable {
    fn new(headers: Vec<String>) -> Self {
        RawTable {
            headers,
            rows: Vec::new(),
            row_numbers: Vec::new(),
            dropped: Vec::new(),
            rows_read: 0,
            truncated: false,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV front-end
// ---------------------------------------------------------------------------

/// Decode as UTF-8 (invalid bytes become replacement characters) and read
/// records.  Header handling, the row limit and the row-length policy all
/// live here; cells stay untyped.
fn read_csv(bytes: &[u8], options: &IngestOptions) -> Result<RawTable, IngestError> {
    let text = String::from_utf8_lossy(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String>;
    // With no header row the first record is also data.
    let mut pending: Option<csv::StringRecord> = None;
    match records.next() {
        None => return Err(IngestError::EmptyInput),
        Some(first) => {
            let first = first?;
            if options.has_header {
                headers = named_headers(&first);
            } else {
                headers = positional_headers(first.len());
                pending = Some(first);
            }
        }
    }
    check_duplicate_names(&headers)?;

    let mut table = RawTable::new(headers);
    if let Some(first) = pending {
        if !accept_record(&mut table, &first, options)? {
            return Ok(table);
        }
    }
    for result in records {
        let record = result?;
        if !accept_record(&mut table, &record, options)? {
            break;
        }
    }
    Ok(table)
}

/// Apply the row limit and the row-length policy to one record.
/// Returns `Ok(false)` when the limit was hit and reading should stop.
fn accept_record(
    table: &mut RawTable,
    record: &csv::StringRecord,
    options: &IngestOptions,
) -> Result<bool, IngestError> {
    if let Some(limit) = options.max_rows {
        if table.rows_read == limit {
            if options.strict {
                return Err(IngestError::TooManyRows { limit });
            }
            warn!("row limit of {limit} reached, ignoring the rest of the input");
            table.truncated = true;
            return Ok(false);
        }
    }
    table.rows_read += 1;
    let row = table.rows_read;

    let expected = table.headers.len();
    let actual = record.len();
    if actual != expected {
        if options.strict {
            return Err(IngestError::RowLengthMismatch {
                row,
                expected,
                actual,
            });
        }
        warn!("dropping row {row}: expected {expected} fields, found {actual}");
        table.dropped.push(DroppedRow {
            row,
            reason: format!("expected {expected} fields, found {actual}"),
        });
        return Ok(true);
    }

    table.rows.push(record.iter().map(str::to_string).collect());
    table.row_numbers.push(row);
    Ok(true)
}

/// Column names from the header record; blank header cells get positional
/// names so the column stays addressable.
fn named_headers(record: &csv::StringRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(i, name)| header_name(i, name))
        .collect()
}

/// Trimmed name for column `i` (0-based), or `col_{i + 1}` when blank.
fn header_name(i: usize, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        format!("col_{}", i + 1)
    } else {
        name.to_string()
    }
}

fn positional_headers(width: usize) -> Vec<String> {
    (1..=width).map(|i| format!("col_{i}")).collect()
}

fn check_duplicate_names(headers: &[String]) -> Result<(), IngestError> {
    let mut seen = BTreeSet::new();
    for name in headers {
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateColumnName { name: name.clone() });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON front-end
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "Kenya", "Year": 2020, "Yield": 1.4 },
///   { "Country": "Chad",  "Year": 2019, "Yield": null }
/// ]
/// ```
///
/// Columns are the union of the record keys in first-appearance order;
/// blank keys get positional names like blank CSV header cells.  Absent
/// keys and explicit nulls both become missing cells; nested arrays or
/// objects are rejected.
fn read_json(bytes: &[u8], options: &IngestOptions) -> Result<RawTable, IngestError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root
        .as_array()
        .ok_or_else(|| IngestError::JsonShape("expected a top-level array of records".into()))?;
    if records.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let mut keys: Vec<String> = Vec::new();
    let mut kept: Vec<&serde_json::Map<String, JsonValue>> = Vec::new();
    let mut rows_read = 0usize;
    let mut truncated = false;

    for (i, record) in records.iter().enumerate() {
        if let Some(limit) = options.max_rows {
            if rows_read == limit {
                if options.strict {
                    return Err(IngestError::TooManyRows { limit });
                }
                warn!("row limit of {limit} reached, ignoring the rest of the input");
                truncated = true;
                break;
            }
        }
        rows_read += 1;
        let obj = record.as_object().ok_or_else(|| {
            IngestError::JsonShape(format!("record {} is not an object", i + 1))
        })?;
        for key in obj.keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.clone());
            }
        }
        kept.push(obj);
    }

    // Cells are addressed by the original record keys; the column names go
    // through the same blank-name rule as a CSV header row.
    let headers: Vec<String> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| header_name(i, key))
        .collect();
    check_duplicate_names(&headers)?;

    let mut rows = Vec::with_capacity(kept.len());
    for (i, obj) in kept.iter().enumerate() {
        let mut row = Vec::with_capacity(keys.len());
        for name in &keys {
            let cell = match obj.get(name) {
                None | Some(JsonValue::Null) => String::new(),
                Some(JsonValue::String(s)) => s.clone(),
                Some(JsonValue::Number(n)) => n.to_string(),
                Some(JsonValue::Bool(b)) => b.to_string(),
                Some(other) => {
                    let kind = if other.is_array() { "array" } else { "object" };
                    return Err(IngestError::JsonShape(format!(
                        "record {}, field '{name}': nested {kind} values are not supported",
                        i + 1
                    )));
                }
            };
            row.push(cell);
        }
        rows.push(row);
    }

    let row_numbers = (1..=rows.len()).collect();
    Ok(RawTable {
        headers,
        rows,
        row_numbers,
        dropped: Vec::new(),
        rows_read,
        truncated,
    })
}

// ---------------------------------------------------------------------------
// Typing and validation
// ---------------------------------------------------------------------------

/// Infer a type per column from a bounded sample, then re-walk every cell
/// enforcing it.  Non-strict runs null bad cells and record their
/// coordinates; strict runs fail on the first one.
fn type_and_validate(table: RawTable, options: &IngestOptions) -> Result<Ingested, IngestError> {
    let RawTable {
        headers,
        rows,
        row_numbers,
        dropped,
        rows_read,
        truncated,
    } = table;

    let mut candidates: Vec<TypeCandidate> = headers.iter().map(|_| TypeCandidate::new()).collect();
    for row in &rows {
        for (candidate, cell) in candidates.iter_mut().zip(row) {
            candidate.observe(cell);
        }
    }
    let types: Vec<ColumnType> = candidates.iter().map(TypeCandidate::decide).collect();
    for (name, ty) in headers.iter().zip(&types) {
        debug!("column '{name}' inferred as {ty}");
    }

    let mut columns: Vec<Column> = headers
        .iter()
        .zip(&types)
        .map(|(name, ty)| Column {
            name: name.clone(),
            ty: *ty,
            values: Vec::with_capacity(rows.len()),
        })
        .collect();
    let mut counts: Vec<ColumnCounts> = headers
        .iter()
        .map(|name| ColumnCounts {
            name: name.clone(),
            missing: 0,
            malformed: 0,
        })
        .collect();
    let mut malformed_cells = Vec::new();

    for (row, row_no) in rows.iter().zip(&row_numbers) {
        for (idx, cell) in row.iter().enumerate() {
            if infer::is_missing(cell) {
                counts[idx].missing += 1;
                columns[idx].values.push(None);
            } else if infer::parses_as(cell, types[idx]) {
                columns[idx].values.push(Some(cell.clone()));
            } else if options.strict {
                return Err(IngestError::UnparsableCell {
                    row: *row_no,
                    column: headers[idx].clone(),
                    value: cell.clone(),
                    expected: types[idx],
                });
            } else {
                counts[idx].malformed += 1;
                malformed_cells.push(MalformedCell {
                    row: *row_no,
                    column: headers[idx].clone(),
                    value: cell.clone(),
                });
                columns[idx].values.push(None);
            }
        }
    }

    let dataset = Dataset { columns };
    let stats = SummaryStats::compute(&dataset);
    let report = ValidationReport {
        row_count: rows.len(),
        rows_read,
        columns: counts,
        dropped_rows: dropped,
        malformed_cells,
        truncated,
    };
    Ok(Ingested {
        dataset,
        report,
        stats,
    })
}
