//! Input discovery and workbook decoding.
//!
//! Lists the `.xlsx` files of the input folder and decodes the first
//! worksheet of a workbook into a [`Table`] via `calamine`.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use sales_core::error::{Result, SalesError};
use sales_core::models::FileDescriptor;
use sales_core::table::{Cell, Table, TableReader};
use tracing::{debug, warn};

// ── Discovery ─────────────────────────────────────────────────────────────────

/// List the `.xlsx` files directly inside `input_dir`, sorted by path.
///
/// The extension check ignores case. Sub-directories are not descended.
pub fn find_xlsx_files(input_dir: &Path) -> Vec<FileDescriptor> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", input_dir.display(), err);
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    debug!("Found {} .xlsx files in {}", files.len(), input_dir.display());
    files.into_iter().map(FileDescriptor::new).collect()
}

// ── XlsxReader ────────────────────────────────────────────────────────────────

/// [`TableReader`] backed by `calamine`.
///
/// The first row of the first worksheet is the header row. Fully empty data
/// rows are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReader;

impl TableReader for XlsxReader {
    fn read_table(&self, path: &Path) -> Result<Table> {
        let read_err = |reason: String| SalesError::Read {
            path: path.to_path_buf(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| read_err(e.to_string()))?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| read_err("workbook has no sheets".to_string()))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| read_err(e.to_string()))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(idx, cell)| match cell {
                    Data::String(s) if !s.trim().is_empty() => s.clone(),
                    other => match to_cell(other).as_text() {
                        h if h.is_empty() => format!("Unnamed: {}", idx),
                        h => h,
                    },
                })
                .collect(),
            None => Vec::new(),
        };

        let data: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(to_cell).collect::<Vec<Cell>>())
            .filter(|row| !row.iter().all(Cell::is_empty))
            .collect();

        debug!(
            "Read {} rows x {} columns from {}",
            data.len(),
            headers.len(),
            path.display()
        );
        Ok(Table::new(headers, data))
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
