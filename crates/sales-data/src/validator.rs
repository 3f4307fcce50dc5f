//! Schema and data-type validation of one sales workbook.
//!
//! Validation is all-or-nothing per file: either every row is usable and a
//! [`ValidatedRow`] is produced for each, or the file is rejected with a
//! coded [`FileError`].

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use sales_core::calendar::DateOrder;
use sales_core::error::{FileError, SalesError};
use sales_core::models::{ClassificationResult, ValidatedRow};
use sales_core::stats::mode;
use sales_core::table::{Table, TableReader};
use tracing::warn;

/// Columns every sales workbook must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Date",
    "Region",
    "Salesperson",
    "Product",
    "Quantity",
    "UnitPrice",
];

/// Derived columns; source columns with these names are not carried through.
const DERIVED_COLUMNS: [&str; 2] = ["RegionOrigen", "Total"];

// ── Public types ──────────────────────────────────────────────────────────────

/// The detected month/year of a file's rows differs from its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMismatch {
    pub detected_month: u32,
    pub detected_year: i32,
    pub expected_month: u32,
    pub expected_year: i32,
}

/// Successful validation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// One row per input row, in input order.
    pub rows: Vec<ValidatedRow>,
    /// Set when the dates point at a different month/year. Non-fatal.
    pub mismatch: Option<DateMismatch>,
}

struct Columns {
    date: usize,
    region: usize,
    salesperson: usize,
    product: usize,
    quantity: usize,
    unit_price: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read `path` and validate it. Decode failures become
/// [`FileError::ReadFailure`].
pub fn validate_file(
    reader: &dyn TableReader,
    path: &Path,
    classification: &ClassificationResult,
) -> Result<Validation, FileError> {
    let table = reader.read_table(path).map_err(|e| FileError::ReadFailure {
        path: path.to_path_buf(),
        reason: match e {
            SalesError::Read { reason, .. } => reason,
            other => other.to_string(),
        },
    })?;

    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    validate(&table, classification, &label)
}

/// Validate a decoded table against the required schema.
///
/// `label` names the file in the consistency warning.
pub fn validate(
    table: &Table,
    classification: &ClassificationResult,
    label: &str,
) -> Result<Validation, FileError> {
    let columns = resolve_columns(table)?;

    let dates: Vec<Option<NaiveDate>> = (0..table.row_count())
        .map(|row| table.cell(row, columns.date).as_date(DateOrder::DayFirst))
        .collect();
    let quantities: Vec<Option<f64>> = (0..table.row_count())
        .map(|row| table.cell(row, columns.quantity).as_number())
        .collect();
    let prices: Vec<Option<f64>> = (0..table.row_count())
        .map(|row| table.cell(row, columns.unit_price).as_number())
        .collect();

    let mut invalid = Vec::new();
    if dates.iter().any(Option::is_none) {
        invalid.push("Date".to_string());
    }
    if quantities.iter().any(Option::is_none) {
        invalid.push("Quantity".to_string());
    }
    if prices.iter().any(Option::is_none) {
        invalid.push("UnitPrice".to_string());
    }
    if !invalid.is_empty() {
        return Err(FileError::InvalidData(invalid));
    }

    let dates: Vec<NaiveDate> = dates.into_iter().flatten().collect();
    let mismatch = check_consistency(&dates, classification);
    if let Some(m) = &mismatch {
        warn!(
            "Inconsistency detected: {} contains data from {:02}/{} (expected: {:02}/{})",
            label, m.detected_month, m.detected_year, m.expected_month, m.expected_year
        );
    }

    let extra = extra_columns(table, &columns);
    let rows = dates
        .into_iter()
        .zip(quantities.into_iter().flatten())
        .zip(prices.into_iter().flatten())
        .enumerate()
        .map(|(row, ((date, quantity), unit_price))| ValidatedRow {
            date,
            region: table.cell(row, columns.region).as_text(),
            salesperson: table.cell(row, columns.salesperson).as_text(),
            product: table.cell(row, columns.product).as_text(),
            quantity,
            unit_price,
            total: quantity * unit_price,
            region_origen: classification.region.clone(),
            extra: extra
                .iter()
                .map(|(col, name)| (name.clone(), table.cell(row, *col).clone()))
                .collect(),
        })
        .collect();

    Ok(Validation { rows, mismatch })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn resolve_columns(table: &Table) -> Result<Columns, FileError> {
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| table.column(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(FileError::MissingColumns(missing));
    }

    // All present: lookups below cannot fail.
    let col = |name: &str| table.column(name).unwrap_or_default();
    Ok(Columns {
        date: col("Date"),
        region: col("Region"),
        salesperson: col("Salesperson"),
        product: col("Product"),
        quantity: col("Quantity"),
        unit_price: col("UnitPrice"),
    })
}

/// Non-required columns as `(index, trimmed header)`, in source order.
fn extra_columns(table: &Table, columns: &Columns) -> Vec<(usize, String)> {
    let required = [
        columns.date,
        columns.region,
        columns.salesperson,
        columns.product,
        columns.quantity,
        columns.unit_price,
    ];
    table
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !required.contains(idx))
        .map(|(idx, h)| (idx, h.trim().to_string()))
        .filter(|(_, h)| !h.is_empty() && !DERIVED_COLUMNS.contains(&h.as_str()))
        .collect()
}

fn check_consistency(dates: &[NaiveDate], c: &ClassificationResult) -> Option<DateMismatch> {
    let month = mode(dates.iter().map(|d| d.month()))?;
    let year = mode(dates.iter().map(|d| d.year()))?;
    if month == c.month && year == c.year {
        return None;
    }
    Some(DateMismatch {
        detected_month: month,
        detected_year: year,
        expected_month: c.month,
        expected_year: c.year,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
