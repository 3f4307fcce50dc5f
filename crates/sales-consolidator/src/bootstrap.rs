use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name to an `EnvFilter` directive. Unknown names map to
/// `"info"`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Path of today's run log inside `output_dir`.
pub fn log_file_path(output_dir: &Path) -> PathBuf {
    output_dir.join(format!("log_{}.log", Local::now().format("%Y-%m-%d")))
}

/// Initialise the global `tracing` subscriber.
///
/// Events go both to stdout and to `<output_dir>/log_<YYYY-MM-DD>.log`
/// (appended, no ANSI colours). Returns the log file path.
pub fn setup_logging(log_level: &str, output_dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let log_path = log_file_path(output_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer().with_target(false).with_writer(io::stdout);
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(log_path)
}

// ── Move confirmation ──────────────────────────────────────────────────────────

/// Ask whether MOVE mode may proceed. `S`, `s`, `y` and `Y` confirm.
pub fn confirm_move(mut input: impl BufRead, mut output: impl Write) -> io::Result<bool> {
    write!(
        output,
        "MOVE mode removes the files from the input folder. Continue? (S/N): "
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "S" | "s" | "y" | "Y"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
