//! End-of-run summary: log block and optional JSON export.

use std::fs;
use std::path::Path;

use sales_core::error::{ErrorCode, Result};
use sales_core::models::{RunCounters, RunMode};
use tracing::info;

/// Lines of the summary block, in logging order.
///
/// Error codes with no incidents are omitted.
pub fn summary_lines(counters: &RunCounters, mode: RunMode) -> Vec<String> {
    let mut lines = vec![
        "========== SUMMARY ==========".to_string(),
        format!("Mode: {}", mode),
        format!("Files processed OK: {}", counters.files_ok),
        format!("Duplicates renamed: {}", counters.duplicates),
        format!("Reports generated: {}", counters.reports_generated),
        format!("Files with errors: {}", counters.errors),
    ];

    if counters.inferred_from_content > 0 {
        lines.push(format!(
            "Names inferred from content: {}",
            counters.inferred_from_content
        ));
    }
    if counters.inconsistent_dates > 0 {
        lines.push(format!(
            "Files with inconsistent dates: {}",
            counters.inconsistent_dates
        ));
    }

    for code in ErrorCode::ALL {
        let n = counters.count(code);
        if n > 0 {
            lines.push(format!("  {} → {} incidents", code, n));
        }
    }

    lines.push("=============================".to_string());
    lines
}

/// Emit the summary block at INFO.
pub fn log_summary(counters: &RunCounters, mode: RunMode) {
    for line in summary_lines(counters, mode) {
        info!("{}", line);
    }
}

/// Write `counters` as pretty JSON to `path`.
///
/// Writes to a sibling temp file first, then renames over the target.
pub fn write_summary_json(counters: &RunCounters, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(counters)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    info!("Summary written to {}", path.display());
    Ok(())
}
