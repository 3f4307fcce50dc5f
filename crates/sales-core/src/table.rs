//! Decoded spreadsheet data and the codec seams.
//!
//! A [`Table`] is the first worksheet of a workbook: a header row plus data
//! rows of [`Cell`]s. Readers and writers live behind [`TableReader`] and
//! [`WorkbookWriter`] so the pipeline never touches a spreadsheet library
//! directly.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::calendar::{parse_date, DateOrder};
use crate::error::Result;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A single decoded spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion. Text is trimmed and parsed; booleans count as 1/0.
    /// Non-finite results are treated as missing.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Cell::Empty | Cell::DateTime(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Date coercion. Native date cells are used as-is; text goes through
    /// [`parse_date`] with the given `order`. Numbers are never dates.
    pub fn as_date(&self, order: DateOrder) -> Option<NaiveDate> {
        match self {
            Cell::DateTime(dt) => Some(dt.date()),
            Cell::Text(s) => parse_date(s, order),
            _ => None,
        }
    }

    /// Text rendering used for string columns such as Region or Product.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.to_string(),
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Header row plus data rows of one worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first column whose trimmed header equals `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell at `(row, col)`; short rows read as [`Cell::Empty`].
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ── Sheet ─────────────────────────────────────────────────────────────────────

/// A named worksheet to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

// ── Codec seams ───────────────────────────────────────────────────────────────

/// Reads the first worksheet of a spreadsheet file.
pub trait TableReader {
    fn read_table(&self, path: &Path) -> Result<Table>;
}

/// Writes a workbook made of the given sheets, in order.
pub trait WorkbookWriter {
    fn write_workbook(&self, path: &Path, sheets: &[Sheet]) -> Result<()>;
}
