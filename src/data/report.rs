use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ValidationReport – what ingestion rejected or coerced
// ---------------------------------------------------------------------------

/// A row excluded from the dataset, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// 1-based data row number (header not counted).
    pub row: usize,
    pub reason: String,
}

/// Coordinates of a cell that failed to parse as its column's inferred type
/// and was set to null (non-strict mode only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedCell {
    /// 1-based data row number.
    pub row: usize,
    pub column: String,
    pub value: String,
}

/// Missing / malformed tallies for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCounts {
    pub name: String,
    /// Cells that were empty or a not-available marker.
    pub missing: usize,
    /// Cells that failed to parse as the column's inferred type.
    pub malformed: usize,
}

/// Record of everything the loader rejected or coerced while building a
/// [`super::model::Dataset`]. Returned alongside the dataset so the hosting
/// application can show the user what happened to their upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Rows in the final dataset.
    pub row_count: usize,
    /// Data rows read from the input, dropped rows included. Rows cut off by
    /// `max_rows` are not read and therefore not counted.
    pub rows_read: usize,
    /// Per-column tallies, in dataset column order.
    pub columns: Vec<ColumnCounts>,
    pub dropped_rows: Vec<DroppedRow>,
    pub malformed_cells: Vec<MalformedCell>,
    /// True when `max_rows` cut the input short (non-strict mode).
    pub truncated: bool,
}

impl ValidationReport {
    /// True when nothing was dropped, coerced or truncated. Missing values
    /// alone do not make an upload unclean; a sparse dataset is still valid.
    pub fn is_clean(&self) -> bool {
        self.dropped_rows.is_empty() && self.malformed_cells.is_empty() && !self.truncated
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    pub fn total_malformed(&self) -> usize {
        self.columns.iter().map(|c| c.malformed).sum()
    }

    /// Share of non-null cells in the final dataset, in `0.0..=1.0`.
    pub fn completeness(&self) -> f64 {
        let cells = self.row_count * self.columns.len();
        if cells == 0 {
            return 1.0;
        }
        let nulls = self.total_missing() + self.total_malformed();
        1.0 - nulls as f64 / cells as f64
    }

    /// One-line human-readable digest for status bars and logs.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} rows kept of {} read, {} dropped, {} malformed cells, {} missing values",
            self.row_count,
            self.rows_read,
            self.dropped_rows.len(),
            self.total_malformed(),
            self.total_missing(),
        );
        if self.truncated {
            line.push_str(" (input truncated)");
        }
        line
    }

    /// Serialize the report for download or API responses.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_problems() -> ValidationReport {
        ValidationReport {
            row_count: 4,
            rows_read: 5,
            columns: vec![
                ColumnCounts {
                    name: "Country".into(),
                    missing: 0,
                    malformed: 0,
                },
                ColumnCounts {
                    name: "Year".into(),
                    missing: 1,
                    malformed: 1,
                },
            ],
            dropped_rows: vec![DroppedRow {
                row: 3,
                reason: "expected 2 fields, found 1".into(),
            }],
            malformed_cells: vec![MalformedCell {
                row: 4,
                column: "Year".into(),
                value: "soon".into(),
            }],
            truncated: false,
        }
    }

    #[test]
    fn clean_report_has_no_findings() {
        let report = ValidationReport {
            row_count: 2,
            rows_read: 2,
            columns: vec![ColumnCounts {
                name: "A".into(),
                missing: 1,
                malformed: 0,
            }],
            dropped_rows: Vec::new(),
            malformed_cells: Vec::new(),
            truncated: false,
        };
        // Missing values alone keep the report clean.
        assert!(report.is_clean());
        assert_eq!(report.total_missing(), 1);
    }

    #[test]
    fn problems_mark_the_report_dirty() {
        let report = report_with_problems();
        assert!(!report.is_clean());
        assert_eq!(report.total_malformed(), 1);
        assert_eq!(report.total_missing(), 1);
    }

    #[test]
    fn completeness_counts_all_null_cells() {
        let report = report_with_problems();
        // 8 cells, 2 null.
        assert!((report.completeness() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn summary_mentions_truncation_only_when_it_happened() {
        let mut report = report_with_problems();
        assert!(!report.summary().contains("truncated"));
        report.truncated = true;
        assert!(report.summary().contains("truncated"));
    }

    #[test]
    fn json_export_round_trips() {
        let report = report_with_problems();
        let json = report.to_json().unwrap();
        let back: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
