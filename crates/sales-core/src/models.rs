use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar;
use crate::error::{ErrorCode, FileError};
use crate::table::Cell;

/// A spreadsheet discovered in the input folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name as found on disk.
    pub file_name: String,
}

impl FileDescriptor {
    pub fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }
}

/// Grouping key for one consolidated report.
///
/// `month_name` is always looked up from `month` in the fixed month table,
/// so two keys with the same year and month are always equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
}

impl GroupKey {
    /// Build a key, returning `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let month_name = calendar::month_name(month)?;
        Some(Self {
            year,
            month,
            month_name,
        })
    }

    /// Folder name inside the year directory, e.g. `"03_Marzo"`.
    pub fn folder_name(&self) -> String {
        format!("{:02}_{}", self.month, self.month_name)
    }

    /// File name of the consolidated report, e.g.
    /// `"Ventas_Consolidadas_2024_03.xlsx"`.
    pub fn report_file_name(&self) -> String {
        format!("Ventas_Consolidadas_{}_{:02}.xlsx", self.year, self.month)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    Filename,
    Content,
}

/// Region and month/year assigned to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub region: String,
    pub month: u32,
    pub month_name: &'static str,
    pub year: i32,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    /// Build a result for `month`/`year`, or `None` for an invalid month.
    pub fn new(
        region: impl Into<String>,
        month: u32,
        year: i32,
        source: ClassificationSource,
    ) -> Option<Self> {
        let month_name = calendar::month_name(month)?;
        Some(Self {
            region: region.into(),
            month,
            month_name,
            year,
            source,
        })
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            year: self.year,
            month: self.month,
            month_name: self.month_name,
        }
    }
}

/// One transaction row that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub date: NaiveDate,
    pub region: String,
    pub salesperson: String,
    pub product: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// `quantity * unit_price`.
    pub total: f64,
    /// Region taken from the file's classification.
    pub region_origen: String,
    /// Non-required source columns, carried through in source order.
    pub extra: Vec<(String, Cell)>,
}

/// All validated rows for one group, sorted by date.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyDataset {
    pub rows: Vec<ValidatedRow>,
    /// Union of the extra columns across files, in first-seen order.
    pub extra_columns: Vec<String>,
}

/// Per-product summary within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub product: String,
    pub total_quantity: f64,
    pub total_amount: f64,
}

/// How input files are relocated into the output hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Copy,
    Move,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Copy => f.write_str("COPY"),
            RunMode::Move => f.write_str("MOVE"),
        }
    }
}

// ── RunCounters ───────────────────────────────────────────────────────────────

/// Tallies accumulated over one run and reported in the final summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunCounters {
    /// Files that passed validation.
    pub files_ok: u32,
    /// Files skipped for any reason.
    pub errors: u32,
    /// Files renamed because their destination already existed.
    pub duplicates: u32,
    /// Consolidated workbooks written.
    pub reports_generated: u32,
    /// Files whose month/year had to be inferred from content (warning).
    pub inferred_from_content: u32,
    /// Files whose dates disagree with their group (warning).
    pub inconsistent_dates: u32,
    /// Incidents per stable error code.
    pub by_code: BTreeMap<ErrorCode, u32>,
}

impl RunCounters {
    /// Count a coded per-file failure.
    pub fn record_file_error(&mut self, err: &FileError) {
        self.errors += 1;
        *self.by_code.entry(err.code()).or_insert(0) += 1;
    }

    /// Count a failure that has no stable code (I/O during placement or
    /// report writing).
    pub fn record_uncoded_error(&mut self) {
        self.errors += 1;
    }

    pub fn record_ok(&mut self) {
        self.files_ok += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    pub fn record_report(&mut self) {
        self.reports_generated += 1;
    }

    pub fn record_content_inference(&mut self) {
        self.inferred_from_content += 1;
    }

    pub fn record_inconsistent_dates(&mut self) {
        self.inconsistent_dates += 1;
    }

    /// Incidents recorded for `code`.
    pub fn count(&self, code: ErrorCode) -> u32 {
        self.by_code.get(&code).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_key_names() {
        let key = GroupKey::new(2024, 3).unwrap();
        assert_eq!(key.month_name, "Marzo");
        assert_eq!(key.folder_name(), "03_Marzo");
        assert_eq!(key.report_file_name(), "Ventas_Consolidadas_2024_03.xlsx");
        assert_eq!(key.to_string(), "03/2024");
    }

    #[test]
    fn test_group_key_rejects_bad_month() {
        assert!(GroupKey::new(2024, 0).is_none());
        assert!(GroupKey::new(2024, 13).is_none());
    }

    #[test]
    fn test_group_key_orders_chronologically() {
        let mut keys = vec![
            GroupKey::new(2024, 1).unwrap(),
            GroupKey::new(2023, 12).unwrap(),
            GroupKey::new(2023, 2).unwrap(),
        ];
        keys.sort();
        let order: Vec<(i32, u32)> = keys.iter().map(|k| (k.year, k.month)).collect();
        assert_eq!(order, vec![(2023, 2), (2023, 12), (2024, 1)]);
    }

    #[test]
    fn test_classification_group_key() {
        let c = ClassificationResult::new("North", 4, 2023, ClassificationSource::Content).unwrap();
        assert_eq!(c.month_name, "Abril");
        assert_eq!(c.group_key(), GroupKey::new(2023, 4).unwrap());
    }

    #[test]
    fn test_file_descriptor_name() {
        let fd = FileDescriptor::new(PathBuf::from("/data/Input/sales_north_march_2024.xlsx"));
        assert_eq!(fd.file_name, "sales_north_march_2024.xlsx");
    }

    #[test]
    fn test_run_counters_tally() {
        let mut c = RunCounters::default();
        c.record_file_error(&FileError::InvalidData(vec!["Quantity".into()]));
        c.record_file_error(&FileError::Unclassifiable(PathBuf::from("x.xlsx")));
        c.record_file_error(&FileError::InvalidData(vec!["Date".into()]));
        c.record_uncoded_error();
        c.record_ok();
        c.record_duplicate();
        c.record_report();
        c.record_content_inference();

        assert_eq!(c.errors, 4);
        assert_eq!(c.inferred_from_content, 1);
        assert_eq!(c.inconsistent_dates, 0);
        assert_eq!(c.count(ErrorCode::E002), 2);
        assert_eq!(c.count(ErrorCode::E004), 1);
        assert_eq!(c.count(ErrorCode::E001), 0);
        assert_eq!(c.files_ok, 1);
        assert_eq!(c.duplicates, 1);
        assert_eq!(c.reports_generated, 1);
    }

    #[test]
    fn test_run_counters_serialize() {
        let mut c = RunCounters::default();
        c.record_file_error(&FileError::MissingColumns(vec!["Date".into()]));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["errors"], 1);
        assert_eq!(json["by_code"]["E001"], 1);
    }

    #[test]
    fn test_run_mode_display() {
        assert_eq!(RunMode::default(), RunMode::Copy);
        assert_eq!(RunMode::Move.to_string(), "MOVE");
    }
}
