//! Data layer for the sales consolidator.
//!
//! Responsible for discovering and decoding input workbooks, classifying
//! them by month/year, validating their rows, aggregating each month and
//! encoding the consolidated report.

pub mod aggregator;
pub mod classifier;
pub mod reader;
pub mod report;
pub mod validator;
pub mod writer;

pub use sales_core as core;
