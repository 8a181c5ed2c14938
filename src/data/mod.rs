//! Data layer: upload ingestion, the columnar model, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .txt / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  decode → infer types → validate
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Ingested │  Dataset + ValidationReport + SummaryStats
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  apply value predicates → visible rows
//!   └──────────┘
//! ```

pub mod filter;
pub mod infer;
pub mod loader;
pub mod model;
pub mod report;
pub mod stats;
