//! Sweep event reporting: operator console lines plus an optional JSONL
//! audit sink.
//!
//! Architecture: a dedicated logger thread owns both sinks. Sweep threads
//! send [`SweepEvent`] values through a cheaply-cloneable [`Reporter`]
//! handle over an unbounded crossbeam channel. Every deletion attempt must
//! surface a report, so events are never dropped under back-pressure.

#![allow(missing_docs)]

pub mod jsonl;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::core::errors::{Result, SweepError};
use crate::logger::jsonl::{AuditRecord, JsonlWriter};

// ──────────────────── events ────────────────────

/// Everything a sweep run can tell the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepEvent {
    /// A directory could not be opened or listed; its subtree was abandoned.
    ListFailed { path: PathBuf, error: String },
    /// An expired entry was removed.
    Deleted { path: PathBuf },
    /// An expired entry could not be removed (for example a directory that
    /// still has children). The traversal continues.
    DeleteFailed { path: PathBuf, error: String },
    /// A per-entry worker thread could not be spawned; the entry was swept
    /// inline instead.
    SpawnFailed { details: String },
    /// End-of-run summary carrying the wall-clock elapsed time.
    RunCompleted {
        entries: usize,
        deleted: usize,
        failed: usize,
        elapsed: Duration,
    },
    /// Sentinel to request graceful shutdown of the logger thread.
    Shutdown,
}

// ──────────────────── reporter handle ────────────────────

/// Thread-safe, cheaply-cloneable handle for sending sweep events.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: Sender<SweepEvent>,
}

impl Reporter {
    /// Send an event to the logger thread.
    ///
    /// A disconnected channel is tolerated; it only happens while the run is
    /// shutting down.
    pub fn report(&self, event: SweepEvent) {
        let _ = self.tx.send(event);
    }

    /// Request graceful shutdown of the logger thread.
    pub fn shutdown(&self) {
        let _ = self.tx.send(SweepEvent::Shutdown);
    }

    /// Reporter backed by a plain channel, for tests and embedding: events
    /// accumulate on the returned receiver instead of a logger thread.
    #[must_use]
    pub fn collector() -> (Self, Receiver<SweepEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

// ──────────────────── configuration ────────────────────

/// Options for building the logger.
#[derive(Debug, Clone, Default)]
pub struct LoggerConfig {
    /// Path of the JSONL audit file. `None` disables the audit sink.
    pub jsonl_path: Option<PathBuf>,
}

// ──────────────────── spawn ────────────────────

/// Spawn the logger thread and return a reporter handle plus the join
/// handle. The thread runs until [`Reporter::shutdown`] is called or all
/// reporters are dropped.
pub fn spawn_logger(config: LoggerConfig) -> Result<(Reporter, thread::JoinHandle<()>)> {
    let (tx, rx) = unbounded::<SweepEvent>();
    let reporter = Reporter { tx };

    let join = thread::Builder::new()
        .name("tsw-logger".to_string())
        .spawn(move || logger_thread_main(&rx, config.jsonl_path))
        .map_err(|e| SweepError::Runtime {
            details: format!("failed to spawn logger thread: {e}"),
        })?;

    Ok((reporter, join))
}

// ──────────────────── logger thread ────────────────────

fn logger_thread_main(rx: &Receiver<SweepEvent>, jsonl_path: Option<PathBuf>) {
    let mut audit = jsonl_path.map(|path| JsonlWriter::open(&path));

    while let Ok(event) = rx.recv() {
        if matches!(event, SweepEvent::Shutdown) {
            break;
        }
        print_event(&event);
        if let Some(writer) = &mut audit {
            writer.append(&record_for(&event));
        }
    }

    if let Some(writer) = &mut audit {
        writer.flush();
    }
}

/// Console rendering. Progress goes to stdout, failures to stderr; the
/// `Deleted <path>` and `Elapsed <duration>` lines are the tool's stable
/// operator surface.
fn print_event(event: &SweepEvent) {
    match event {
        SweepEvent::ListFailed { path, error } => {
            eprintln!("cannot read {}: {error}", path.display());
        }
        SweepEvent::Deleted { path } => {
            println!("Deleted {}", path.display());
        }
        SweepEvent::DeleteFailed { path, error } => {
            eprintln!("failed to delete {}: {error}", path.display());
        }
        SweepEvent::SpawnFailed { details } => {
            eprintln!("sweep dispatch failed: {details}");
        }
        SweepEvent::RunCompleted { elapsed, .. } => {
            println!("Elapsed {elapsed:?}");
        }
        SweepEvent::Shutdown => {}
    }
}

// ──────────────────── audit conversion ────────────────────

fn record_for(event: &SweepEvent) -> AuditRecord {
    match event {
        SweepEvent::ListFailed { path, error } => {
            let mut r = AuditRecord::new("list_failed");
            r.path = Some(path.to_string_lossy().to_string());
            r.error = Some(error.clone());
            r
        }
        SweepEvent::Deleted { path } => {
            let mut r = AuditRecord::new("deleted");
            r.path = Some(path.to_string_lossy().to_string());
            r
        }
        SweepEvent::DeleteFailed { path, error } => {
            let mut r = AuditRecord::new("delete_failed");
            r.path = Some(path.to_string_lossy().to_string());
            r.error = Some(error.clone());
            r
        }
        SweepEvent::SpawnFailed { details } => {
            let mut r = AuditRecord::new("spawn_failed");
            r.error = Some(details.clone());
            r
        }
        SweepEvent::RunCompleted {
            entries,
            deleted,
            failed,
            elapsed,
        } => {
            let mut r = AuditRecord::new("run_completed");
            r.entries = Some(*entries);
            r.deleted = Some(*deleted);
            r.failed = Some(*failed);
            r.duration_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
            r
        }
        SweepEvent::Shutdown => AuditRecord::new("shutdown"),
    }
}

// ──────────────────── tests ────────────────────
