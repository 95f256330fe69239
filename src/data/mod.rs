//! Dataset loading and inspection
//!
//! CSV ingestion plus the exploratory summaries printed at the start of the
//! pipeline: schema profile, null counts, and a numeric describe table.

mod loader;
mod profile;

pub use loader::{load_csv, write_csv};
pub use profile::{describe_numeric, profile, ColumnProfile, DatasetProfile, NumericSummary};
pub(crate) use profile::is_numeric_dtype;
