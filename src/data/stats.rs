use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics for every column of a dataset, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub columns: Vec<ColumnSummary>,
}

/// Statistics for one column. Numeric columns get moments and extrema,
/// everything else gets frequency-based measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub name: String,
    /// Non-null values that parsed as numbers.
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sample standard deviation (ddof = 1); `None` below two values.
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub name: String,
    /// Non-null values.
    pub count: usize,
    pub distinct: usize,
    /// Most frequent value; ties resolve to the lexicographically smallest.
    pub most_frequent: Option<String>,
}

impl ColumnSummary {
    pub fn name(&self) -> &str {
        match self {
            ColumnSummary::Numeric(s) => &s.name,
            ColumnSummary::Categorical(s) => &s.name,
        }
    }
}

impl SummaryStats {
    /// Compute statistics over all columns. Integer and float columns are
    /// summarized numerically; string, boolean and date columns are
    /// summarized by value frequency.
    pub fn compute(dataset: &Dataset) -> SummaryStats {
        let rows = dataset.row_count();
        let columns = dataset
            .columns
            .iter()
            .map(|col| {
                if col.ty.is_numeric() {
                    let mut acc = NumericAccumulator::default();
                    for row in 0..rows {
                        if let Some(value) = col.numeric_value(row) {
                            acc.observe(value);
                        }
                    }
                    ColumnSummary::Numeric(acc.finish(col.name.clone()))
                } else {
                    let mut acc = FrequencyAccumulator::default();
                    for value in col.values.iter().flatten() {
                        acc.observe(value);
                    }
                    ColumnSummary::Categorical(acc.finish(col.name.clone()))
                }
            })
            .collect();
        SummaryStats { columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Streaming accumulators
// ---------------------------------------------------------------------------

/// Welford's online algorithm, so mean and variance stay stable on long
/// columns without a second pass.
#[derive(Debug, Default)]
struct NumericAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl NumericAccumulator {
    fn observe(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            if value < self.min {
                self.min = value;
            }
            if value > self.max {
                self.max = value;
            }
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    fn finish(self, name: String) -> NumericSummary {
        let std_dev = if self.count >= 2 {
            Some((self.m2 / (self.count - 1) as f64).sqrt())
        } else {
            None
        };
        let present = self.count > 0;
        NumericSummary {
            name,
            count: self.count,
            mean: present.then_some(self.mean),
            min: present.then_some(self.min),
            max: present.then_some(self.max),
            std_dev,
        }
    }
}

#[derive(Debug, Default)]
struct FrequencyAccumulator {
    count: usize,
    frequencies: BTreeMap<String, usize>,
}

impl FrequencyAccumulator {
    fn observe(&mut self, value: &str) {
        self.count += 1;
        *self.frequencies.entry(value.to_string()).or_insert(0) += 1;
    }

    fn finish(self, name: String) -> CategoricalSummary {
        // BTreeMap iterates in key order, so keeping only strictly greater
        // counts leaves the smallest key among tied modes.
        let mut most_frequent = None;
        let mut best = 0usize;
        for (value, n) in &self.frequencies {
            if *n > best {
                best = *n;
                most_frequent = Some(value.clone());
            }
        }
        CategoricalSummary {
            name,
            count: self.count,
            distinct: self.frequencies.len(),
            most_frequent,
        }
    }
}
