//! Entry dispatch: sequential, or one worker thread per entry joined by a
//! task group before the run completes.

use std::thread;

use crate::logger::{Reporter, SweepEvent};
use crate::sweeper::entries::ExpireEntry;
use crate::sweeper::tree::{SweepStats, TreeSweeper};

// ──────────────────── modes & totals ────────────────────

/// How list entries are dispatched, fixed once for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Each entry's traversal returns before the next entry is pulled.
    Sequential,
    /// Each entry is dispatched immediately on receipt as its own thread.
    /// Unbounded fan-out; completion order between entries is unspecified.
    Concurrent,
}

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries pulled from the list.
    pub entries: usize,
    /// Deletion counters summed across all entries.
    pub stats: SweepStats,
}

// ──────────────────── task group ────────────────────

/// Join-handle tracker for concurrently dispatched sweeps.
///
/// Waiting on the group is the run's completion barrier: the run is not
/// finished until every dispatched sweep has returned.
#[derive(Default)]
pub struct TaskGroup {
    handles: Vec<thread::JoinHandle<SweepStats>>,
}

impl TaskGroup {
    /// Empty group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawn a named worker whose stats are collected at join time.
    pub fn spawn<F>(&mut self, name: String, job: F) -> std::io::Result<()>
    where
        F: FnOnce() -> SweepStats + Send + 'static,
    {
        self.handles.push(thread::Builder::new().name(name).spawn(job)?);
        Ok(())
    }

    /// Number of outstanding workers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether any workers are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Block until every worker has finished, summing their stats. A worker
    /// that panicked contributes nothing.
    pub fn wait(self) -> SweepStats {
        let mut total = SweepStats::default();
        for handle in self.handles {
            if let Ok(stats) = handle.join() {
                total.absorb(stats);
            }
        }
        total
    }
}

// ──────────────────── scheduler ────────────────────

/// Pulls entries from the source and drives the tree sweeper.
pub struct Scheduler {
    mode: DispatchMode,
    reporter: Reporter,
}

impl Scheduler {
    /// New scheduler; `reporter` is handed to every sweep it dispatches.
    pub fn new(mode: DispatchMode, reporter: Reporter) -> Self {
        Self { mode, reporter }
    }

    /// Consume the entry source one entry at a time and sweep each tree.
    ///
    /// The source is always read by this single caller; only the per-entry
    /// processing fans out. Returns after every dispatched sweep has
    /// completed.
    pub fn run<I>(&self, entries: I) -> RunSummary
    where
        I: IntoIterator<Item = ExpireEntry>,
    {
        let mut summary = RunSummary::default();
        let mut group = TaskGroup::new();

        for (index, entry) in entries.into_iter().enumerate() {
            summary.entries += 1;
            match self.mode {
                DispatchMode::Sequential => {
                    summary.stats.absorb(sweep_entry(&entry, &self.reporter));
                }
                DispatchMode::Concurrent => {
                    let reporter = self.reporter.clone();
                    let job = entry.clone();
                    let spawned = group
                        .spawn(format!("tsw-sweep-{index}"), move || {
                            sweep_entry(&job, &reporter)
                        });
                    if let Err(e) = spawned {
                        // Keep the entry best-effort even when the system
                        // refuses another thread.
                        self.reporter.report(SweepEvent::SpawnFailed {
                            details: format!("{}: {e}", entry.dir.display()),
                        });
                        summary.stats.absorb(sweep_entry(&entry, &self.reporter));
                    }
                }
            }
        }

        summary.stats.absorb(group.wait());
        summary
    }
}

/// One entry: the day count becomes a second count here, at the dispatch
/// boundary.
fn sweep_entry(entry: &ExpireEntry, reporter: &Reporter) -> SweepStats {
    TreeSweeper::new(entry.retention_seconds(), reporter.clone()).sweep(&entry.dir)
}

// ──────────────────── tests ────────────────────
