//! Tabular dataset ingestion for dashboard back-ends.
//!
//! Takes a raw upload (delimited text or records-oriented JSON), infers a
//! type per column, validates every cell against it and returns the typed
//! [`Dataset`] together with a [`ValidationReport`] of everything that was
//! rejected or coerced and per-column [`SummaryStats`].
//!
//! ```
//! use granary::{ingest, IngestOptions, RawUpload};
//!
//! let upload = RawUpload::new("crops.csv", "Country,Year\nKenya,2020\nChad,2019\n");
//! let out = ingest(&upload, &IngestOptions::default())?;
//! assert_eq!(out.dataset.row_count(), 2);
//! assert!(out.report.is_clean());
//! # Ok::<(), granary::IngestError>(())
//! ```

pub mod chart;
pub mod data;
pub mod error;
pub mod session;

pub use chart::{bar_slices, xy_series, BarSlice, ChartError, Series};
pub use data::filter::{filtered_rows, init_filter_state, FilterState};
pub use data::loader::{ingest, IngestOptions, Ingested};
pub use data::model::{Column, ColumnType, Dataset, RawUpload};
pub use data::report::ValidationReport;
pub use data::stats::{ColumnSummary, SummaryStats};
pub use error::IngestError;
pub use session::Session;
