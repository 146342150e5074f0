//! Top-level CLI definition and dispatch.

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell as CompletionShell, generate};

use tempsweeper::core::config::Config;
use tempsweeper::core::errors::Result;
use tempsweeper::logger::{LoggerConfig, SweepEvent, spawn_logger};
use tempsweeper::sweeper::entries::EntryReader;
use tempsweeper::sweeper::scheduler::{DispatchMode, Scheduler};

/// Temp Sweeper: deletes files older than per-directory retention windows.
#[derive(Debug, Parser)]
#[command(
    name = "tsw",
    author,
    version,
    about = "Temp Sweeper - directory expiry sweeper",
    long_about = None
)]
pub struct Cli {
    /// Expiry list file: one `<directory> <days>` pair per line.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Process entries concurrently, one worker thread per entry.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    concurrently: Option<bool>,
    /// Override settings (TOML) file path.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Generate shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<CompletionShell>,
}

/// Execute one sweep run (or an auxiliary action) for the parsed CLI.
///
/// Per-directory and per-deletion failures are reported by the logger and
/// never reach the exit status; only a missing expiry list or a broken
/// settings file produces an `Err`.
pub fn run(args: &Cli) -> Result<()> {
    if let Some(shell) = args.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "tsw", &mut io::stdout());
        return Ok(());
    }

    let settings = Config::load(args.settings.as_deref())?;
    let entries_file = args
        .config
        .clone()
        .unwrap_or_else(|| settings.sweep.entries_file.clone());
    let mode = if args.concurrently.unwrap_or(settings.sweep.concurrent) {
        DispatchMode::Concurrent
    } else {
        DispatchMode::Sequential
    };

    let start = Instant::now();
    let source = EntryReader::open(&entries_file)?;
    let (reporter, logger) = spawn_logger(LoggerConfig {
        jsonl_path: settings.log.jsonl_path.clone(),
    })?;

    let summary = Scheduler::new(mode, reporter.clone()).run(source);

    reporter.report(SweepEvent::RunCompleted {
        entries: summary.entries,
        deleted: summary.stats.deleted,
        failed: summary.stats.failed,
        elapsed: start.elapsed(),
    });
    reporter.shutdown();
    let _ = logger.join();

    Ok(())
}
