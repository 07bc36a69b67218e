//! File-system capability used by a synchronization run.
//!
//! The run only needs to list files, read them, and write one file back.
//! [`OsFileSystem`] does this against the real disk; [`MemoryFileSystem`]
//! keeps everything in a map so the phases can be exercised without touching
//! the disk.

use crate::error::{Result, SyncError};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Minimal set of file operations a run performs.
pub trait FileSystem {
    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Lists every file under `root`, recursively, in a stable order.
    ///
    /// Symlinks to files are listed; symlinked directories are not descended.
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Reads a whole file as UTF-8. Invalid UTF-8 is a read error.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replaces the contents of `path`.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| SyncError::Walk {
                path: source.path().unwrap_or(root).to_path_buf(),
                source,
            })?;
            let file_type = entry.file_type();
            // Broken links are kept so reading them fails loudly.
            if file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes through a temporary file next to the resolved target, then
    /// renames it over the target, so an interrupted write never leaves a
    /// truncated list. Symlinks are followed and read-only files are refused.
    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let write_err = |source: io::Error| SyncError::Write {
            path: path.to_path_buf(),
            source,
        };

        let target = match std::fs::canonicalize(path) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
            Err(e) => return Err(write_err(e)),
        };

        let existing = match std::fs::metadata(&target) {
            Ok(meta) => Some(meta),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(write_err(e)),
        };
        if existing.as_ref().is_some_and(|m| m.permissions().readonly()) {
            return Err(write_err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file is read-only",
            )));
        }

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        if let Some(meta) = existing {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&target).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}

/// An in-memory file system.
///
/// Every ancestor of an inserted file counts as a directory. Empty
/// directories can be registered with [`MemoryFileSystem::with_dir`].
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a UTF-8 file, returning `self` for chaining.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.insert(path, contents.as_bytes().to_vec());
        self
    }

    /// Adds a file with arbitrary bytes.
    pub fn with_bytes(self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        self.insert(path, contents.to_vec());
        self
    }

    /// Registers an empty directory.
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.dirs.borrow_mut().insert(path.into());
        self
    }

    /// Returns the current contents of `path` as a string, if present and UTF-8.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(path.as_ref())
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }

    fn insert(&self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        let path = path.into();
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        self.files.borrow_mut().insert(path, bytes);
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let read_err = |source: io::Error| SyncError::Read {
            path: path.to_path_buf(),
            source,
        };

        let files = self.files.borrow();
        let bytes = files
            .get(path)
            .ok_or_else(|| read_err(io::Error::from(io::ErrorKind::NotFound)))?;
        String::from_utf8(bytes.clone())
            .map_err(|e| read_err(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.insert(path, contents.as_bytes().to_vec());
        Ok(())
    }
}
