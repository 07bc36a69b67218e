//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Every subcommand shares the same input options: where to scan, which
//! whitelist to update, and how to recognise declarations.

use crate::scanner::{DEFAULT_EXTENSION, DEFAULT_RECEIVER};
use crate::sync::SyncConfig;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Keep the generated component whitelist in sync with declared names.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan sources and rewrite the whitelist, appending new names commented out.
    Sync {
        #[command(flatten)]
        input: InputArgs,

        /// Show what would change without writing the whitelist.
        #[arg(long)]
        dry_run: bool,

        /// Ask for confirmation before writing.
        #[arg(short, long, conflicts_with = "dry_run")]
        interactive: bool,

        /// Emit the run report as JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// Exit non-zero when the whitelist is out of date with the sources.
    Check {
        #[command(flatten)]
        input: InputArgs,

        /// Emit the run report as JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// List files that would be scanned and the names each declares.
    Scan {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, ClapArgs)]
pub struct InputArgs {
    /// Root of the source tree to scan for component declarations.
    #[arg(long, default_value = "packages/components/nodes")]
    pub src_dir: PathBuf,

    /// Whitelist file to read and rewrite.
    #[arg(long, default_value = "packages/server/src/utils/whitelistNodes.ts")]
    pub whitelist_file: PathBuf,

    /// File name suffix of source files to scan.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Object whose `name` property declares the component name (e.g. `this.name = '...'`).
    #[arg(long, default_value = DEFAULT_RECEIVER)]
    pub receiver: String,

    /// Glob patterns for directories/files to skip (e.g., "node_modules", "*.test.ts").
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

impl From<InputArgs> for SyncConfig {
    fn from(input: InputArgs) -> Self {
        let mut config = SyncConfig::new(input.src_dir, input.whitelist_file);
        config.extension = input.extension;
        config.receiver = input.receiver;
        config.exclude = input.exclude;
        config
    }
}
