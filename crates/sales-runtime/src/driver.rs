//! End-to-end consolidation run.
//!
//! Discovers the input workbooks, classifies them into month/year groups,
//! places each file in its group folder, validates it from there and writes
//! one consolidated report per group with data.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use sales_core::error::{FileError, Result, SalesError};
use sales_core::models::{
    ClassificationResult, ClassificationSource, FileDescriptor, GroupKey, RunCounters, RunMode,
};
use sales_core::table::{TableReader, WorkbookWriter};
use sales_data::aggregator::MonthlyAggregator;
use sales_data::{classifier, reader, report, validator};
use tracing::{debug, error, info, warn};

use crate::placement;

type Groups = BTreeMap<GroupKey, Vec<(FileDescriptor, ClassificationResult)>>;

// ── GroupingDriver ────────────────────────────────────────────────────────────

/// Runs one consolidation pass over an input folder.
///
/// Groups are processed in chronological order. Per-file failures are
/// counted and logged; they never abort the run.
pub struct GroupingDriver<R, W> {
    reader: R,
    writer: W,
    output_root: PathBuf,
    mode: RunMode,
}

impl<R: TableReader, W: WorkbookWriter> GroupingDriver<R, W> {
    pub fn new(reader: R, writer: W, output_root: impl Into<PathBuf>, mode: RunMode) -> Self {
        Self {
            reader,
            writer,
            output_root: output_root.into(),
            mode,
        }
    }

    /// Process every `.xlsx` file directly inside `input_root`.
    ///
    /// Fails only when the input folder does not exist or holds no `.xlsx`
    /// files; everything else is reflected in the returned counters.
    pub fn run(&self, input_root: &Path) -> Result<RunCounters> {
        if !input_root.is_dir() {
            return Err(SalesError::InputNotFound(input_root.to_path_buf()));
        }

        let files = reader::find_xlsx_files(input_root);
        if files.is_empty() {
            return Err(SalesError::NoInputFiles(input_root.to_path_buf()));
        }
        info!("Processing {} files from {}", files.len(), input_root.display());

        let mut counters = RunCounters::default();
        let groups = self.classify_files(files, &mut counters);
        let started = Local::now().naive_local();

        for (key, members) in groups {
            self.process_group(key, members, started, &mut counters);
        }

        Ok(counters)
    }

    // ── Classification ────────────────────────────────────────────────────

    fn classify_files(&self, files: Vec<FileDescriptor>, counters: &mut RunCounters) -> Groups {
        let mut groups = Groups::new();

        for file in files {
            let Some(classification) = classifier::classify(&self.reader, &file.path) else {
                let err = FileError::Unclassifiable(file.path.clone());
                error!("{}", err);
                counters.record_file_error(&err);
                continue;
            };

            if classification.source == ClassificationSource::Content {
                warn!(
                    "[E004] Non-conforming file name: {} (month/year inferred from content: {:02}/{})",
                    file.file_name, classification.month, classification.year
                );
                counters.record_content_inference();
            }

            debug!(
                "{} -> {} ({})",
                file.file_name,
                classification.group_key(),
                classification.region
            );
            groups
                .entry(classification.group_key())
                .or_default()
                .push((file, classification));
        }

        groups
    }

    // ── Per-group processing ──────────────────────────────────────────────

    fn process_group(
        &self,
        key: GroupKey,
        members: Vec<(FileDescriptor, ClassificationResult)>,
        now: NaiveDateTime,
        counters: &mut RunCounters,
    ) {
        let folder = match placement::group_folder(&self.output_root, &key) {
            Ok(folder) => folder,
            Err(e) => {
                error!("Could not create output folder for {}: {}", key, e);
                for _ in &members {
                    counters.record_uncoded_error();
                }
                return;
            }
        };

        let mut rows_per_file = Vec::with_capacity(members.len());

        for (file, classification) in &members {
            let Some(placed) = self.place(file, &folder, now, counters) else {
                continue;
            };

            match validator::validate_file(&self.reader, &placed, classification) {
                Ok(validation) => {
                    if validation.mismatch.is_some() {
                        counters.record_inconsistent_dates();
                    }
                    debug!("{}: {} valid rows", file.file_name, validation.rows.len());
                    counters.record_ok();
                    rows_per_file.push(validation.rows);
                }
                Err(e) => {
                    error!("Skipping {}: {}", file.file_name, e);
                    counters.record_file_error(&e);
                }
            }
        }

        let Some((dataset, ranking)) = MonthlyAggregator::aggregate(rows_per_file) else {
            info!("No valid data for {}", folder.display());
            return;
        };

        match report::write_report(&self.writer, &folder, &key, &dataset, &ranking) {
            Ok(_) => counters.record_report(),
            Err(e) => {
                error!("Could not write report for {}: {}", key, e);
                counters.record_uncoded_error();
            }
        }
    }

    /// Copy or move `file` into `folder`, returning where it landed.
    fn place(
        &self,
        file: &FileDescriptor,
        folder: &Path,
        now: NaiveDateTime,
        counters: &mut RunCounters,
    ) -> Option<PathBuf> {
        let dest = placement::resolve_destination(folder, &file.file_name, now);
        if dest.duplicate {
            warn!(
                "Duplicate file: {} saved as {}",
                file.file_name,
                dest.path.display()
            );
            counters.record_duplicate();
        }

        match placement::place_file(&file.path, &dest.path, self.mode) {
            Ok(()) => Some(dest.path),
            Err(e) => {
                error!(
                    "Could not place {} into {}: {}",
                    file.file_name,
                    folder.display(),
                    e
                );
                counters.record_uncoded_error();
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
