// src/process/mod.rs
pub mod dataset;
pub mod date_parser;
pub mod raw_table;
pub mod records;
pub mod summary;
pub mod window;

pub use dataset::Dataset;
pub use raw_table::RawTable;
pub use records::{normalize, MetricRecord};
pub use summary::{compute_summary, SummaryEntry};
