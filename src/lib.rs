//! whitelist-sync library for keeping a generated component whitelist current.
//!
//! The whitelist is a generated module listing component names, one per
//! line, with unreviewed names commented out. A run has three phases:
//!
//! 1. **Scanning**: Collect source files and extract `this.name = '...'` declarations
//! 2. **Parsing**: Read the existing whitelist and each entry's review state
//! 3. **Merging**: Append unseen names commented out, sort, and rewrite the file
//!
//! # Example
//!
//! ```no_run
//! use whitelist_sync::{OsFileSystem, SyncConfig, synchronize};
//!
//! let config = SyncConfig::new(
//!     "packages/components/nodes",
//!     "packages/server/src/utils/whitelistNodes.ts",
//! );
//! let report = synchronize(&OsFileSystem, &config).unwrap();
//!
//! println!("Added {} new names", report.added.len());
//! ```

pub mod cli;
pub mod error;
pub mod fs;
pub mod merger;
pub mod rewriter;
pub mod scanner;
pub mod sync;
pub mod whitelist;

// Re-export commonly used types at crate root
pub use error::SyncError;
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use sync::{Report, SyncConfig, plan, synchronize};
pub use whitelist::{Entry, Whitelist};
