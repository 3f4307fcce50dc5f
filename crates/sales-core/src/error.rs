use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ── ErrorCode ─────────────────────────────────────────────────────────────────

/// Stable incident codes reported in logs and in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ErrorCode {
    /// Required column absent after header normalisation.
    E001,
    /// Null Date / Quantity / UnitPrice after coercion.
    E002,
    /// File unreadable or corrupt.
    E003,
    /// Neither filename nor content yields a month/year.
    E004,
}

impl ErrorCode {
    /// All codes in reporting order.
    pub const ALL: [ErrorCode; 4] = [ErrorCode::E001, ErrorCode::E002, ErrorCode::E003, ErrorCode::E004];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── FileError ─────────────────────────────────────────────────────────────────

/// A per-file failure. The file is skipped and counted; the run continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    /// One or more required columns are missing. Names are sorted.
    #[error("[E001] Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// At least one row has a null value in the named columns.
    #[error("[E002] Invalid data: {}", describe_invalid(.0))]
    InvalidData(Vec<String>),

    /// The spreadsheet could not be decoded.
    #[error("[E003] Could not read file {path}: {reason}")]
    ReadFailure { path: PathBuf, reason: String },

    /// No month/year could be derived from the name or the content.
    #[error("[E004] Could not determine month/year: {0}")]
    Unclassifiable(PathBuf),
}

impl FileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FileError::MissingColumns(_) => ErrorCode::E001,
            FileError::InvalidData(_) => ErrorCode::E002,
            FileError::ReadFailure { .. } => ErrorCode::E003,
            FileError::Unclassifiable(_) => ErrorCode::E004,
        }
    }
}

fn describe_invalid(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| {
            if c == "Date" {
                format!("invalid dates in \"{}\"", c)
            } else {
                format!("non-numeric values in \"{}\"", c)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

// ── SalesError ────────────────────────────────────────────────────────────────

/// Run-level errors produced by the consolidator crates.
#[derive(Error, Debug)]
pub enum SalesError {
    /// The input directory does not exist.
    #[error("Input folder not found: {0}")]
    InputNotFound(PathBuf),

    /// The input directory contains no `.xlsx` files.
    #[error("No .xlsx files found in {0}")]
    NoInputFiles(PathBuf),

    /// A workbook could not be opened or decoded.
    #[error("Failed to read workbook {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// A workbook could not be written.
    #[error("Failed to write workbook {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the consolidator crates.
pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_display() {
        let err = FileError::MissingColumns(vec!["Quantity".into(), "UnitPrice".into()]);
        assert_eq!(
            err.to_string(),
            "[E001] Missing required columns: Quantity, UnitPrice"
        );
        assert_eq!(err.code(), ErrorCode::E001);
    }

    #[test]
    fn test_invalid_data_names_every_column() {
        let err = FileError::InvalidData(vec!["Date".into(), "Quantity".into()]);
        let msg = err.to_string();
        assert!(msg.starts_with("[E002]"));
        assert!(msg.contains("invalid dates in \"Date\""));
        assert!(msg.contains("non-numeric values in \"Quantity\""));
        assert_eq!(err.code(), ErrorCode::E002);
    }

    #[test]
    fn test_read_failure_display() {
        let err = FileError::ReadFailure {
            path: PathBuf::from("/in/broken.xlsx"),
            reason: "zip error".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("[E003]"));
        assert!(msg.contains("/in/broken.xlsx"));
        assert!(msg.contains("zip error"));
    }

    #[test]
    fn test_unclassifiable_code() {
        let err = FileError::Unclassifiable(PathBuf::from("notes.xlsx"));
        assert_eq!(err.code(), ErrorCode::E004);
        assert_eq!(err.to_string(), "[E004] Could not determine month/year: notes.xlsx");
    }

    #[test]
    fn test_error_code_order() {
        let mut codes = vec![ErrorCode::E003, ErrorCode::E001, ErrorCode::E004, ErrorCode::E002];
        codes.sort();
        assert_eq!(codes, ErrorCode::ALL.to_vec());
    }

    #[test]
    fn test_sales_error_display_input_not_found() {
        let err = SalesError::InputNotFound(PathBuf::from("/missing/Input"));
        assert_eq!(err.to_string(), "Input folder not found: /missing/Input");
    }

    #[test]
    fn test_sales_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SalesError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
