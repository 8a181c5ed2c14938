//! Chart-ready projections of a dataset: point series and aggregated bars.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::{Column, Dataset};

// ---------------------------------------------------------------------------
// Chart errors
// ---------------------------------------------------------------------------

/// Why a chart cannot be built from the requested columns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),
}

// ---------------------------------------------------------------------------
// Series builders
// ---------------------------------------------------------------------------

/// A named sequence of `[x, y]` points, ready for a line or scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSlice {
    pub label: String,
    pub value: f64,
}

/// Build `[x, y]` series from two numeric columns, optionally split into one
/// series per distinct value of `group_by`.
///
/// Rows where either coordinate is null are skipped. Series appear in the
/// order their group value first occurs; null group cells are labelled
/// `"null"`. Without `group_by` a single series named after the y column is
/// returned.
pub fn xy_series(
    dataset: &Dataset,
    x: &str,
    y: &str,
    group_by: Option<&str>,
) -> Result<Vec<Series>, ChartError> {
    let x_col = numeric_column(dataset, x)?;
    let y_col = numeric_column(dataset, y)?;
    let group_col = match group_by {
        Some(name) => Some(lookup(dataset, name)?),
        None => None,
    };

    let mut series: Vec<Series> = Vec::new();
    for row in 0..dataset.row_count() {
        let (Some(xv), Some(yv)) = (x_col.numeric_value(row), y_col.numeric_value(row)) else {
            continue;
        };
        let name = match group_col {
            Some(col) => col.value(row).unwrap_or("null").to_string(),
            None => y.to_string(),
        };
        match series.iter_mut().find(|s| s.name == name) {
            Some(s) => s.points.push([xv, yv]),
            None => series.push(Series {
                name,
                points: vec![[xv, yv]],
            }),
        }
    }
    Ok(series)
}

/// Build one bar per distinct value of `category`, carrying the mean of the
/// numeric `value` column over that group.
///
/// Rows with a null value cell are skipped; bars appear in the order their
/// category first occurs, with null category cells labelled `"null"`.
pub fn bar_slices(
    dataset: &Dataset,
    category: &str,
    value: &str,
) -> Result<Vec<BarSlice>, ChartError> {
    let cat_col = lookup(dataset, category)?;
    let val_col = numeric_column(dataset, value)?;

    // (label, sum, count) in first-appearance order.
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for row in 0..dataset.row_count() {
        let Some(v) = val_col.numeric_value(row) else {
            continue;
        };
        let label = cat_col.value(row).unwrap_or("null").to_string();
        match groups.iter_mut().find(|(l, _, _)| *l == label) {
            Some((_, sum, n)) => {
                *sum += v;
                *n += 1;
            }
            None => groups.push((label, v, 1)),
        }
    }

    Ok(groups
        .into_iter()
        .map(|(label, sum, n)| BarSlice {
            label,
            value: sum / n as f64,
        })
        .collect())
}

fn lookup<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ChartError> {
    dataset
        .column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ChartError> {
    let column = lookup(dataset, name)?;
    if !column.ty.is_numeric() {
        return Err(ChartError::NonNumericColumn(name.to_string()));
    }
    Ok(column)
}
