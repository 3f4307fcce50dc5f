use clap::Parser;
use std::path::PathBuf;

use crate::models::RunMode;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Consolidate monthly regional sales spreadsheets into dated reports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-consolidator",
    about = "Consolidate monthly regional sales spreadsheets into dated reports",
    version
)]
pub struct Settings {
    /// Copy the input files into the output tree (default mode)
    #[arg(long)]
    pub copy: bool,

    /// Move the input files into the output tree (asks for confirmation)
    #[arg(long = "move", conflicts_with = "copy")]
    pub move_files: bool,

    /// Folder containing the input .xlsx files
    #[arg(long, default_value = "Input")]
    pub input: PathBuf,

    /// Root of the dated output hierarchy; the run log is written here too
    #[arg(long, default_value = "Output")]
    pub output: PathBuf,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Write the run counters as JSON to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

impl Settings {
    /// Parse from an explicit argument list, enabling unit tests without
    /// spawning subprocesses.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args)
    }

    pub fn run_mode(&self) -> RunMode {
        if self.move_files {
            RunMode::Move
        } else {
            RunMode::Copy
        }
    }

    /// Log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}
