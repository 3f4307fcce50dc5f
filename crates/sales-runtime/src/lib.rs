//! Runtime layer for the sales consolidator.
//!
//! Drives a consolidation run end to end: grouping, file placement,
//! per-group reporting and the final summary.

pub mod driver;
pub mod placement;
pub mod summary;

pub use sales_core as core;
pub use sales_data as data;
