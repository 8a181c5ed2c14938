use std::collections::{BTreeMap, BTreeSet};

use super::model::{Column, Dataset};

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column name → set of selected cell
/// values, with `None` standing for null cells.
/// If a column is absent from the map it imposes no constraint; an empty
/// set means "nothing selected" and hides every row.
pub type FilterState = BTreeMap<String, BTreeSet<Option<String>>>;

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    dataset
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.unique_values()))
        .collect()
}

/// Return indices of rows that pass all active filters, in row order.
///
/// A row passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The selected set for that column is empty → nothing selected → fails
/// * Every unique value is selected → passes (no effective filter)
/// * The row's cell for that column is in the selected set → passes
///
/// Filters naming a column the dataset does not have are ignored.
pub fn filtered_rows(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    let mut active: Vec<(&Column, &BTreeSet<Option<String>>)> = Vec::new();
    for (name, selected) in filters {
        let Some(column) = dataset.column(name) else {
            continue;
        };
        if selected.is_empty() {
            // Nothing selected for this column → hide everything
            return Vec::new();
        }
        if column.unique_values().is_subset(selected) {
            continue; // every column value selected, no filtering needed
        }
        active.push((column, selected));
    }

    (0..dataset.row_count())
        .filter(|&row| {
            active
                .iter()
                .all(|(column, selected)| selected.contains(&column.values[row]))
        })
        .collect()
}
