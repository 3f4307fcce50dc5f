//! Month/year classification of input files.
//!
//! The filename is tried first (`sales_<region>_<month>_<year>.xlsx`); when
//! it does not conform, the Date and Region columns of the workbook are
//! inspected instead.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use sales_core::calendar::{month_by_english_name, DateOrder};
use sales_core::models::{ClassificationResult, ClassificationSource};
use sales_core::stats::mode;
use sales_core::table::{Table, TableReader};
use tracing::debug;

/// Region recorded when the content has no usable Region value.
pub const UNKNOWN_REGION: &str = "Unknown region";

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^sales_([a-z]+)_([a-z]+)_([0-9]{4})\.xlsx$").expect("regex is valid")
    })
}

// ── Filename ──────────────────────────────────────────────────────────────────

/// Classify a file by its name alone.
///
/// Returns `None` when the name does not match the pattern or the month
/// token is not an English month name.
pub fn classify_by_name(file_name: &str) -> Option<ClassificationResult> {
    let caps = filename_pattern().captures(file_name)?;
    let region = &caps[1];
    let (month, _) = month_by_english_name(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    ClassificationResult::new(region, month, year, ClassificationSource::Filename)
}

// ── Content ───────────────────────────────────────────────────────────────────

/// Infer month/year from the Date column of `table`.
///
/// Month and year are the most frequent values among the parseable dates,
/// taken independently. The region comes from the first row with a valid
/// date, falling back to [`UNKNOWN_REGION`].
pub fn classify_by_content(table: &Table) -> Option<ClassificationResult> {
    let date_col = table.column("Date")?;
    let region_col = table.column("Region");

    let dated_rows: Vec<(usize, NaiveDate)> = (0..table.row_count())
        .filter_map(|row| {
            table
                .cell(row, date_col)
                .as_date(DateOrder::MonthFirst)
                .map(|d| (row, d))
        })
        .collect();

    let (first_row, _) = *dated_rows.first()?;
    let month = mode(dated_rows.iter().map(|(_, d)| d.month()))?;
    let year = mode(dated_rows.iter().map(|(_, d)| d.year()))?;

    let region = region_col
        .map(|col| table.cell(first_row, col).as_text())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| UNKNOWN_REGION.to_string());

    ClassificationResult::new(region, month, year, ClassificationSource::Content)
}

/// Read `path` and classify it by content. Read failures yield `None`.
pub fn classify_file_content(reader: &dyn TableReader, path: &Path) -> Option<ClassificationResult> {
    match reader.read_table(path) {
        Ok(table) => classify_by_content(&table),
        Err(e) => {
            debug!("Content inspection failed for {}: {}", path.display(), e);
            None
        }
    }
}

/// Run both strategies: filename first, then content.
pub fn classify(reader: &dyn TableReader, path: &Path) -> Option<ClassificationResult> {
    let file_name = path.file_name()?.to_string_lossy();
    classify_by_name(&file_name).or_else(|| classify_file_content(reader, path))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::calendar::MONTHS;
    use sales_core::error::{Result, SalesError};
    use sales_core::table::Cell;
    use std::cell::Cell as Counter;
    use std::path::PathBuf;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn table(rows: &[(&str, &str)]) -> Table {
        Table::new(
            vec!["Date".into(), "Region".into()],
            rows.iter().map(|(d, r)| vec![text(d), text(r)]).collect(),
        )
    }

    /// Reader returning a fixed table (or an error) and counting calls.
    struct StubReader {
        table: Option<Table>,
        calls: Counter<usize>,
    }

    impl TableReader for StubReader {
        fn read_table(&self, path: &Path) -> Result<Table> {
            self.calls.set(self.calls.get() + 1);
            self.table.clone().ok_or_else(|| SalesError::Read {
                path: path.to_path_buf(),
                reason: "corrupt".into(),
            })
        }
    }

    // ── classify_by_name ──────────────────────────────────────────────────────

    #[test]
    fn test_name_every_month_matches_table() {
        for (english, number, local) in MONTHS {
            let name = format!("sales_north_{}_2024.xlsx", english);
            let c = classify_by_name(&name).unwrap();
            assert_eq!(c.month, number);
            assert_eq!(c.month_name, local);
            assert_eq!(c.year, 2024);
            assert_eq!(c.source, ClassificationSource::Filename);
        }
    }

    #[test]
    fn test_name_case_insensitive_region_preserved() {
        let c = classify_by_name("SALES_NorthEast_MARCH_2024.XLSX").unwrap();
        assert_eq!(c.region, "NorthEast");
        assert_eq!(c.month, 3);
        assert_eq!(c.month_name, "Marzo");
    }

    #[test]
    fn test_name_rejects_unknown_month() {
        assert!(classify_by_name("sales_north_marzo_2024.xlsx").is_none());
        assert!(classify_by_name("sales_north_smarch_2024.xlsx").is_none());
    }

    #[test]
    fn test_name_rejects_malformed() {
        for name in [
            "sales_xyz.xlsx",
            "sales_north_march_24.xlsx",
            "sales_north_march_2024.csv",
            "report_north_march_2024.xlsx",
            "sales_north1_march_2024.xlsx",
            "sales_north_march_2024.xlsx.bak",
        ] {
            assert!(classify_by_name(name).is_none(), "{} should not match", name);
        }
    }

    // ── classify_by_content ───────────────────────────────────────────────────

    #[test]
    fn test_content_mode_of_dates() {
        let t = table(&[
            ("2023-04-02", "South"),
            ("2023-04-10", "South"),
            ("2023-05-01", "South"),
        ]);
        let c = classify_by_content(&t).unwrap();
        assert_eq!((c.month, c.year), (4, 2023));
        assert_eq!(c.month_name, "Abril");
        assert_eq!(c.region, "South");
        assert_eq!(c.source, ClassificationSource::Content);
    }

    #[test]
    fn test_content_tie_first_encountered() {
        let t = table(&[("2023-06-01", "A"), ("2023-05-01", "A")]);
        assert_eq!(classify_by_content(&t).unwrap().month, 6);
    }

    #[test]
    fn test_content_skips_bad_dates_for_region() {
        let t = table(&[("garbage", "West"), ("2023-04-02", "East")]);
        let c = classify_by_content(&t).unwrap();
        assert_eq!(c.region, "East");
    }

    #[test]
    fn test_content_reads_month_first() {
        let t = table(&[("04/05/2023", "East")]);
        assert_eq!(classify_by_content(&t).unwrap().month, 4);
    }

    #[test]
    fn test_content_no_valid_dates() {
        let t = table(&[("n/a", "East"), ("", "East")]);
        assert!(classify_by_content(&t).is_none());
    }

    #[test]
    fn test_content_missing_date_column() {
        let t = Table::new(vec!["Region".into()], vec![vec![text("East")]]);
        assert!(classify_by_content(&t).is_none());
    }

    #[test]
    fn test_content_region_placeholder() {
        let no_region = Table::new(vec!["Date".into()], vec![vec![text("2023-04-02")]]);
        assert_eq!(classify_by_content(&no_region).unwrap().region, UNKNOWN_REGION);

        let blank_region = table(&[("2023-04-02", "  ")]);
        assert_eq!(classify_by_content(&blank_region).unwrap().region, UNKNOWN_REGION);
    }

    // ── classify ──────────────────────────────────────────────────────────────

    #[test]
    fn test_classify_prefers_filename() {
        let reader = StubReader {
            table: Some(table(&[("2020-01-01", "X")])),
            calls: Counter::new(0),
        };
        let c = classify(&reader, &PathBuf::from("/in/sales_north_march_2024.xlsx")).unwrap();
        assert_eq!((c.month, c.year), (3, 2024));
        assert_eq!(reader.calls.get(), 0);
    }

    #[test]
    fn test_classify_falls_back_to_content() {
        let reader = StubReader {
            table: Some(table(&[("2023-04-02", "X"), ("2023-04-03", "X")])),
            calls: Counter::new(0),
        };
        let c = classify(&reader, &PathBuf::from("/in/sales_xyz.xlsx")).unwrap();
        assert_eq!((c.month, c.year), (4, 2023));
        assert_eq!(c.source, ClassificationSource::Content);
        assert_eq!(reader.calls.get(), 1);
    }

    #[test]
    fn test_classify_read_failure_is_none() {
        let reader = StubReader {
            table: None,
            calls: Counter::new(0),
        };
        assert!(classify(&reader, &PathBuf::from("/in/broken.xlsx")).is_none());
        assert_eq!(reader.calls.get(), 1);
    }
}
