//! End-to-end synchronization run.
//!
//! Validates both paths, scans the source tree, parses the existing list,
//! merges, and writes the result. [`plan`] stops short of writing so the
//! same run can back `--dry-run` and `check`.

use crate::error::{Result, SyncError};
use crate::fs::FileSystem;
use crate::merger::{self, Merged};
use crate::rewriter;
use crate::scanner::{self, DEFAULT_EXTENSION, DEFAULT_RECEIVER, NamePattern};
use crate::whitelist::{Entry, Whitelist};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root of the source tree to scan for declarations.
    pub src_dir: PathBuf,
    /// Whitelist file, read as prior state and overwritten with the result.
    pub whitelist_file: PathBuf,
    /// File name suffix of source files to scan.
    pub extension: String,
    /// Object whose `name` property declares a component name.
    pub receiver: String,
    /// Glob patterns; files with a matching path component are skipped.
    pub exclude: Vec<String>,
}

impl SyncConfig {
    pub fn new(src_dir: impl Into<PathBuf>, whitelist_file: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            whitelist_file: whitelist_file.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            receiver: DEFAULT_RECEIVER.to_string(),
            exclude: Vec::new(),
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub files_scanned: usize,
    /// Distinct names found in source.
    pub discovered: usize,
    /// Entries in the whitelist before the run.
    pub existing: usize,
    /// Names appended by this run, sorted ignoring case.
    pub added: Vec<String>,
    /// Final entries in written order.
    pub entries: Vec<Entry>,
    /// Whether the rendered whitelist differs from the file on disk.
    pub changed: bool,
    /// Whether the whitelist file was written.
    pub written: bool,
}

/// Fails fast on missing inputs before anything is read.
pub fn validate(fs: &impl FileSystem, config: &SyncConfig) -> Result<()> {
    if !fs.is_dir(&config.src_dir) {
        return Err(SyncError::MissingSourceDir(config.src_dir.clone()));
    }
    if !fs.is_file(&config.whitelist_file) {
        return Err(SyncError::MissingWhitelist(config.whitelist_file.clone()));
    }
    Ok(())
}

/// Computes the new whitelist without writing it.
pub fn plan(fs: &impl FileSystem, config: &SyncConfig) -> Result<Report> {
    validate(fs, config)?;

    let pattern = NamePattern::new(&config.receiver)?;
    let excludes = scanner::compile_excludes(&config.exclude)?;
    let files =
        scanner::collect_source_files(fs, &config.src_dir, &config.extension, &excludes)?;
    let discovered = scanner::discover_names(fs, &files, &pattern)?;

    let existing = Whitelist::load(fs, &config.whitelist_file)?;

    let Merged { entries, added } = merger::merge(&existing, &discovered);
    let changed = rewriter::render(&entries) != existing.source();

    tracing::info!(
        files = files.len(),
        discovered = discovered.len(),
        existing = existing.len(),
        added = added.len(),
        "merged whitelist"
    );

    Ok(Report {
        files_scanned: files.len(),
        discovered: discovered.len(),
        existing: existing.len(),
        added,
        entries,
        changed,
        written: false,
    })
}

/// Runs a full synchronization and overwrites the whitelist file.
///
/// The file is written even when nothing changed.
pub fn synchronize(fs: &impl FileSystem, config: &SyncConfig) -> Result<Report> {
    let report = plan(fs, config)?;
    commit(fs, &config.whitelist_file, report)
}

/// Writes a planned report's entries to `path`.
pub fn commit(fs: &impl FileSystem, path: &Path, mut report: Report) -> Result<Report> {
    rewriter::write_whitelist(fs, path, &report.entries)?;
    report.written = true;
    tracing::debug!(path = %path.display(), "whitelist written");
    Ok(report)
}
