//! Error types for a synchronization run.
//!
//! Every variant is fatal: the run aborts and the operator fixes the cause
//! and re-runs. Lines that fail to match a pattern are not errors and never
//! show up here.

use std::path::PathBuf;

/// Errors that can abort a synchronization run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The source directory does not exist or is not a directory.
    #[error("source directory {} does not exist or is not a directory", .0.display())]
    MissingSourceDir(PathBuf),

    /// The whitelist file does not exist. It is expected to be scaffolded up front.
    #[error("whitelist file {} does not exist", .0.display())]
    MissingWhitelist(PathBuf),

    /// Directory traversal failed partway through.
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A source or whitelist file could not be read, including invalid UTF-8.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The whitelist file could not be written back.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `--exclude` glob did not compile.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A name or entry pattern did not compile.
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl SyncError {
    /// True for errors caused by bad paths or options rather than I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingSourceDir(_)
                | Self::MissingWhitelist(_)
                | Self::Pattern { .. }
                | Self::Regex(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
