use std::collections::BTreeSet;

use crate::data::filter::{filtered_rows, init_filter_state, FilterState};
use crate::data::loader::Ingested;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One user's working state, independent of any front-end: the latest
/// ingested upload plus the current filter selections.
#[derive(Debug, Default)]
pub struct Session {
    /// Outcome of the last ingestion (None until the first upload).
    pub loaded: Option<Loaded>,

    /// Per-column filter selections.
    pub filters: FilterState,

    /// Row indices passing the current filters (cached).
    pub visible_rows: Vec<usize>,

    /// Status message to surface to the user.
    pub status_message: Option<String>,
}

/// An ingested upload together with the name it arrived under.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub filename: String,
    pub outcome: Ingested,
}

impl Session {
    /// Adopt a newly ingested upload: reset filters, show every row and
    /// surface the validation summary.
    pub fn install(&mut self, filename: impl Into<String>, outcome: Ingested) {
        self.filters = init_filter_state(&outcome.dataset);
        self.visible_rows = (0..outcome.dataset.row_count()).collect();
        self.status_message = Some(outcome.report.summary());
        self.loaded = Some(Loaded {
            filename: filename.into(),
            outcome,
        });
    }

    /// Drop the upload and all derived state.
    pub fn clear(&mut self) {
        *self = Session::default();
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.loaded.as_ref().map(|l| &l.outcome.dataset)
    }

    /// Materialize the rows passing the current filters.
    pub fn visible_dataset(&self) -> Option<Dataset> {
        self.loaded
            .as_ref()
            .map(|l| l.outcome.dataset.take_rows(&self.visible_rows))
    }

    /// Recompute `visible_rows` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(loaded) = &self.loaded {
            self.visible_rows = filtered_rows(&loaded.outcome.dataset, &self.filters);
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &Option<String>) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(ds) = self.dataset() {
            if let Some(col) = ds.column(column) {
                let all_values = col.unique_values();
                self.filters.insert(column.to_string(), all_values);
                self.refilter();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }
}
