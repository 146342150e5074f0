//! Recursive tree sweeper: age-based deletion with deferred per-level
//! removal.
//!
//! Each directory level is listed in one batch, expired entries are
//! scheduled onto a pending list in listing order, subdirectories are
//! descended into unconditionally, and only after the whole level (and
//! everything below it) has been processed is the pending list drained from
//! its end, last scheduled first. A subtree's own deletions therefore always
//! land before its parent level's, which is what lets an expired directory
//! be removed once its expired contents are gone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::logger::{Reporter, SweepEvent};

// ──────────────────── stats ────────────────────

/// Deletion counters for one swept tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Entries removed.
    pub deleted: usize,
    /// Removal attempts that failed.
    pub failed: usize,
}

impl SweepStats {
    /// Fold another tree's counters into this one.
    pub fn absorb(&mut self, other: Self) {
        self.deleted += other.deleted;
        self.failed += other.failed;
    }
}

// ──────────────────── sweeper ────────────────────

/// Sweeps one directory tree with a fixed retention threshold.
///
/// Failure semantics: every error is reported and stays local. A directory
/// that cannot be listed abandons only its own subtree; a removal that fails
/// affects neither the remaining pending removals nor the traversal.
pub struct TreeSweeper {
    retention_seconds: i64,
    reporter: Reporter,
}

impl TreeSweeper {
    /// New sweeper for a retention window expressed in seconds.
    pub fn new(retention_seconds: i64, reporter: Reporter) -> Self {
        Self {
            retention_seconds,
            reporter,
        }
    }

    /// Sweep the tree rooted at `root`. The root itself is never a deletion
    /// candidate, only entries beneath it.
    pub fn sweep(&self, root: &Path) -> SweepStats {
        let mut stats = SweepStats::default();
        let now = SystemTime::now();
        self.sweep_dir(root, now, &mut stats);
        stats
    }

    fn sweep_dir(&self, dir: &Path, now: SystemTime, stats: &mut SweepStats) {
        let records = match list_dir(dir) {
            Ok(records) => records,
            Err(e) => {
                self.reporter.report(SweepEvent::ListFailed {
                    path: dir.to_path_buf(),
                    error: e.to_string(),
                });
                return;
            }
        };

        // Scheduled removals for this level only; drained after the loop so
        // every recursive descent below this level has already returned.
        let mut pending: Vec<(PathBuf, bool)> = Vec::new();

        for (path, meta) in records {
            let is_dir = meta.is_dir();
            // The age check does not care whether the entry is a directory;
            // an expired directory is scheduled like any file and its
            // removal simply fails if children survive the recursion.
            if is_expired(meta.modified().ok(), now, self.retention_seconds) {
                pending.push((path.clone(), is_dir));
            }
            if is_dir {
                self.sweep_dir(&path, now, stats);
            }
        }

        for (path, is_dir) in pending.iter().rev() {
            match remove_entry(path, *is_dir) {
                Ok(()) => {
                    stats.deleted += 1;
                    self.reporter.report(SweepEvent::Deleted { path: path.clone() });
                }
                Err(e) => {
                    stats.failed += 1;
                    self.reporter.report(SweepEvent::DeleteFailed {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }
}

// ──────────────────── helpers ────────────────────

/// List one directory in a single batch: entry paths plus metadata. Any
/// failure, including a stat failure halfway through, abandons the level.
///
/// `DirEntry::metadata` does not traverse symlinks, so a symlinked directory
/// is treated as a plain entry and never descended into.
fn list_dir(dir: &Path) -> io::Result<Vec<(PathBuf, fs::Metadata)>> {
    fs::read_dir(dir)?
        .map(|entry| entry.and_then(|e| Ok((e.path(), e.metadata()?))))
        .collect()
}

/// Age test in whole signed seconds. Strict: an entry exactly as old as the
/// window is kept. A missing mtime never expires; a future mtime yields a
/// negative age; a negative retention expires everything.
fn is_expired(modified: Option<SystemTime>, now: SystemTime, retention_seconds: i64) -> bool {
    let Some(modified) = modified else {
        return false;
    };
    let age_seconds = match now.duration_since(modified) {
        Ok(age) => i64::try_from(age.as_secs()).unwrap_or(i64::MAX),
        Err(ahead) => i64::try_from(ahead.duration().as_secs()).map_or(i64::MIN, |s| -s),
    };
    age_seconds > retention_seconds
}

/// Remove a single entry the way the expiry check scheduled it: files are
/// unlinked, directory entries use `remove_dir`, which fails when the
/// directory still has children.
fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::time::Duration;
    use tempfile::TempDir;

    const DAY: i64 = 86_400;

    /// Push a path's mtime `days` into the past.
    fn age_path(path: &Path, days: u64) {
        let mtime = FileTime::from_system_time(
            SystemTime::now() - Duration::from_secs(days * 86_400),
        );
        filetime::set_file_mtime(path, mtime).unwrap();
    }

    fn deleted_paths(events: &[SweepEvent]) -> Vec<PathBuf> {
        events
            .iter()
            .filter_map(|e| match e {
                SweepEvent::Deleted { path } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn deletes_expired_files_and_keeps_fresh_ones() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("old.log");
        let fresh = tmp.path().join("fresh.log");
        fs::write(&old, "stale").unwrap();
        fs::write(&fresh, "current").unwrap();
        age_path(&old, 3);

        let (reporter, rx) = Reporter::collector();
        let stats = TreeSweeper::new(2 * DAY, reporter).sweep(tmp.path());

        assert!(!old.exists());
        assert!(fresh.exists());
        assert_eq!(stats, SweepStats { deleted: 1, failed: 0 });
        assert_eq!(deleted_paths(&rx.try_iter().collect::<Vec<_>>()), vec![old]);
    }

    #[test]
    fn recursion_reaches_nested_dirs_regardless_of_their_age() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("fresh_dir");
        fs::create_dir(&sub).unwrap();
        let buried = sub.join("buried.log");
        fs::write(&buried, "stale").unwrap();
        age_path(&buried, 10);
        // The directory itself is fresh; descent must not depend on its age.

        let (reporter, _rx) = Reporter::collector();
        let stats = TreeSweeper::new(DAY, reporter).sweep(tmp.path());

        assert!(!buried.exists());
        assert!(sub.exists());
        assert_eq!(stats.deleted, 1);
    }

    #[test]
    fn expired_dir_is_removed_after_its_contents() {
        let tmp = TempDir::new().unwrap();
        let stale_dir = tmp.path().join("stale_dir");
        fs::create_dir(&stale_dir).unwrap();
        let inner = stale_dir.join("inner.log");
        fs::write(&inner, "stale").unwrap();
        age_path(&inner, 5);
        age_path(&stale_dir, 5);

        let (reporter, rx) = Reporter::collector();
        let stats = TreeSweeper::new(DAY, reporter).sweep(tmp.path());

        assert!(!stale_dir.exists());
        assert_eq!(stats, SweepStats { deleted: 2, failed: 0 });

        // The file's removal (scheduled one level deeper) must come first;
        // that is the whole point of the deferred per-level drain.
        let deleted = deleted_paths(&rx.try_iter().collect::<Vec<_>>());
        assert_eq!(deleted, vec![inner, stale_dir]);
    }

    #[test]
    fn non_empty_expired_dir_fails_locally() {
        let tmp = TempDir::new().unwrap();
        let stale_dir = tmp.path().join("stale_dir");
        fs::create_dir(&stale_dir).unwrap();
        let survivor = stale_dir.join("survivor.log");
        fs::write(&survivor, "current").unwrap();
        let old = tmp.path().join("old.log");
        fs::write(&old, "stale").unwrap();
        age_path(&old, 5);
        age_path(&stale_dir, 5);

        let (reporter, rx) = Reporter::collector();
        let stats = TreeSweeper::new(DAY, reporter).sweep(tmp.path());

        // The fresh file keeps its expired parent alive; everything else
        // proceeds as usual.
        assert!(survivor.exists());
        assert!(stale_dir.exists());
        assert!(!old.exists());
        assert_eq!(stats, SweepStats { deleted: 1, failed: 1 });

        let events: Vec<SweepEvent> = rx.try_iter().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            SweepEvent::DeleteFailed { path, .. } if path == &stale_dir
        )));
    }

    #[test]
    fn deeper_deletions_precede_shallow_ones() {
        let tmp = TempDir::new().unwrap();
        let shallow = tmp.path().join("shallow.log");
        fs::write(&shallow, "stale").unwrap();
        age_path(&shallow, 5);
        let sub = tmp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let deep = sub.join("deep.log");
        fs::write(&deep, "stale").unwrap();
        age_path(&deep, 5);

        let (reporter, rx) = Reporter::collector();
        TreeSweeper::new(DAY, reporter).sweep(tmp.path());

        // Whatever order the siblings were listed in, the deep file's
        // removal happens during descent, before the root level drains.
        let deleted = deleted_paths(&rx.try_iter().collect::<Vec<_>>());
        assert_eq!(deleted, vec![deep, shallow]);
    }

    #[test]
    fn nonexistent_root_reports_once_and_stops() {
        let (reporter, rx) = Reporter::collector();
        let stats =
            TreeSweeper::new(DAY, reporter).sweep(Path::new("/definitely/does/not/exist"));

        assert_eq!(stats, SweepStats::default());
        let events: Vec<SweepEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SweepEvent::ListFailed { .. }));
    }

    #[test]
    fn empty_directory_is_quiet() {
        let tmp = TempDir::new().unwrap();
        let (reporter, rx) = Reporter::collector();
        let stats = TreeSweeper::new(DAY, reporter).sweep(tmp.path());

        assert_eq!(stats, SweepStats::default());
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn negative_retention_expires_even_fresh_files() {
        let tmp = TempDir::new().unwrap();
        let fresh = tmp.path().join("fresh.log");
        fs::write(&fresh, "current").unwrap();

        let (reporter, _rx) = Reporter::collector();
        let stats = TreeSweeper::new(-DAY, reporter).sweep(tmp.path());

        assert!(!fresh.exists());
        assert_eq!(stats.deleted, 1);
    }

    #[test]
    fn aged_root_is_never_deleted() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("aged_root");
        fs::create_dir(&root).unwrap();
        let old = root.join("old.log");
        fs::write(&old, "stale").unwrap();
        age_path(&old, 5);
        age_path(&root, 5);

        let (reporter, _rx) = Reporter::collector();
        TreeSweeper::new(DAY, reporter).sweep(&root);

        assert!(root.exists());
        assert!(!old.exists());
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let now = SystemTime::now();
        let window = 100;
        let at_window = now - Duration::from_secs(100);
        let past_window = now - Duration::from_secs(101);
        let future = now + Duration::from_secs(50);

        assert!(!is_expired(Some(at_window), now, window));
        assert!(is_expired(Some(past_window), now, window));
        assert!(!is_expired(Some(future), now, 0));
        assert!(!is_expired(None, now, window));
        // Negative windows catch everything, including age zero.
        assert!(is_expired(Some(now), now, -1));
    }
}
