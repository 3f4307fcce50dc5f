//! Core types for the sales consolidator.
//!
//! Domain models, the month table, error taxonomy, run counters, the
//! tabular cell/table abstraction and command-line settings shared by the
//! data and runtime crates.

pub mod calendar;
pub mod error;
pub mod models;
pub mod settings;
pub mod stats;
pub mod table;
