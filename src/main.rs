//! whitelist-sync: keep the generated component whitelist current.
//!
//! Scans the component source tree for `this.name = '...'` declarations,
//! merges newly seen names into the whitelist commented out for review, and
//! rewrites the file sorted by name.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dialoguer::Confirm;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use whitelist_sync::cli::{Args, Commands, InputArgs};
use whitelist_sync::scanner::{self, NamePattern};
use whitelist_sync::sync::{self, Report, SyncConfig};
use whitelist_sync::{FileSystem, OsFileSystem, SyncError};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Sync {
            input,
            dry_run,
            interactive,
            json,
        } => cmd_sync(input, dry_run, interactive, json),
        Commands::Check { input, json } => cmd_check(input, json),
        Commands::Scan { input } => cmd_scan(input),
    };

    if let Err(err) = &result
        && is_configuration_error(err)
    {
        eprintln!(
            "{} check --src-dir, --whitelist-file and --exclude",
            "hint:".cyan().bold()
        );
    }

    result
}

fn is_configuration_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<SyncError>())
        .any(SyncError::is_configuration)
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn cmd_sync(input: InputArgs, dry_run: bool, interactive: bool, json: bool) -> Result<()> {
    let config = SyncConfig::from(input);
    let fs = OsFileSystem;

    let report = sync::plan(&fs, &config)
        .with_context(|| format!("Failed to sync {}", config.whitelist_file.display()))?;

    let listed = listed_before_prompt(interactive && !dry_run, &report);

    let report = if dry_run {
        report
    } else {
        if interactive && !confirm_write(&config, &report)? {
            println!("{} Whitelist left untouched", "info:".blue().bold());
            return Ok(());
        }
        sync::commit(&fs, &config.whitelist_file, report)
            .with_context(|| format!("Failed to write {}", config.whitelist_file.display()))?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !listed {
        print_added(&report);
    }

    if dry_run && report.changed {
        println!(
            "\n{} Run without --dry-run to update {}",
            "hint:".cyan().bold(),
            config.whitelist_file.display()
        );
    }

    Ok(())
}

fn cmd_check(input: InputArgs, json: bool) -> Result<()> {
    let config = SyncConfig::from(input);

    let report = sync::plan(&OsFileSystem, &config)
        .with_context(|| format!("Failed to check {}", config.whitelist_file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.changed && report.added.is_empty() {
        println!(
            "{} {} needs re-sorting or reformatting",
            "info:".blue().bold(),
            config.whitelist_file.display()
        );
    } else if report.changed {
        print_added(&report);
    } else {
        println!(
            "{} {} is up to date ({} entries)",
            "ok:".green().bold(),
            config.whitelist_file.display(),
            report.entries.len()
        );
    }

    if report.changed && report.added.is_empty() {
        anyhow::bail!(
            "{} is not in canonical order or format; run `whitelist-sync sync`",
            config.whitelist_file.display()
        );
    } else if report.changed {
        anyhow::bail!(
            "{} is out of date ({} new name(s)); run `whitelist-sync sync`",
            config.whitelist_file.display(),
            report.added.len()
        );
    }

    Ok(())
}

fn cmd_scan(input: InputArgs) -> Result<()> {
    let config = SyncConfig::from(input);
    let fs = OsFileSystem;

    if !fs.is_dir(&config.src_dir) {
        return Err(SyncError::MissingSourceDir(config.src_dir).into());
    }

    let pattern = NamePattern::new(&config.receiver)?;
    let excludes = scanner::compile_excludes(&config.exclude)?;
    let files =
        scanner::collect_source_files(&fs, &config.src_dir, &config.extension, &excludes)?;
    let scanned = scanner::scan_files(&fs, &files, &pattern)?;

    println!("Would scan {} files:", scanned.len());
    for file in scanned {
        if file.names.is_empty() {
            println!("  {}", file.file.display().to_string().dimmed());
        } else {
            println!("  {} {}", file.file.display(), file.names.join(", ").green());
        }
    }

    Ok(())
}

/// Whether the confirmation prompt already showed the added names.
fn listed_before_prompt(interactive: bool, report: &Report) -> bool {
    interactive && report.changed
}

fn confirm_write(config: &SyncConfig, report: &Report) -> Result<bool> {
    if !report.changed {
        return Ok(true);
    }

    print_added(report);
    let confirmed = Confirm::new()
        .with_prompt(format!("Write {}?", config.whitelist_file.display()))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn print_added(report: &Report) {
    if report.added.is_empty() {
        println!("{} No new names found", "ok:".green().bold());
        return;
    }

    let verb = if report.written {
        "Added"
    } else {
        "Would add"
    };
    println!(
        "\n{} {} new name(s), commented out for review:\n",
        verb.yellow().bold(),
        report.added.len()
    );
    for name in &report.added {
        println!("  {} {}", "+".green(), name);
    }
}
