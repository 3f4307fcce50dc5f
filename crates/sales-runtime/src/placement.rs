//! Output folder hierarchy and physical relocation of input files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use sales_core::models::{GroupKey, RunMode};

/// Where an input file will land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    /// The original name was already taken and a suffix was applied.
    pub duplicate: bool,
}

/// Create (if needed) and return `<output_root>/<year>/<MM>_<MonthName>/`.
pub fn group_folder(output_root: &Path, key: &GroupKey) -> io::Result<PathBuf> {
    let folder = output_root
        .join(key.year.to_string())
        .join(key.folder_name());
    fs::create_dir_all(&folder)?;
    Ok(folder)
}

/// Pick a free destination for `file_name` inside `folder`.
///
/// A taken name becomes `<stem>_dup_<MMDDHHMM><.ext>`; if that is taken as
/// well a `_<n>` counter is appended until the name is free.
pub fn resolve_destination(folder: &Path, file_name: &str, now: NaiveDateTime) -> Destination {
    let direct = folder.join(file_name);
    if !direct.exists() {
        return Destination {
            path: direct,
            duplicate: false,
        };
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let tag = now.format("%m%d%H%M");

    let mut candidate = folder.join(format!("{}_dup_{}{}", stem, tag, ext));
    let mut n = 2;
    while candidate.exists() {
        candidate = folder.join(format!("{}_dup_{}_{}{}", stem, tag, n, ext));
        n += 1;
    }

    Destination {
        path: candidate,
        duplicate: true,
    }
}

/// Copy or move `src` to `dest`.
///
/// A move that cannot be done with a rename (different filesystems) falls
/// back to copy + remove.
pub fn place_file(src: &Path, dest: &Path, mode: RunMode) -> io::Result<()> {
    match mode {
        RunMode::Copy => {
            fs::copy(src, dest)?;
        }
        RunMode::Move => {
            if fs::rename(src, dest).is_err() {
                fs::copy(src, dest)?;
                fs::remove_file(src)?;
            }
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
