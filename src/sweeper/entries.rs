//! Expiry-list entry source.
//!
//! The list is plain text, one entry per line, two whitespace-separated
//! fields: a directory path and an integer day count. The first line that
//! does not match that shape ends the sequence; the caller cannot tell a
//! malformed line apart from end-of-file, and nothing below the first bad
//! line is ever processed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, SweepError};

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// One expiry-list entry: a directory tree and its retention window in days.
///
/// `days` is taken as-is; a negative window expires everything in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpireEntry {
    /// Root of the tree to sweep.
    pub dir: PathBuf,
    /// Retention window in days.
    pub days: i64,
}

impl ExpireEntry {
    /// Retention window in seconds, saturating on absurd day counts.
    #[must_use]
    pub fn retention_seconds(&self) -> i64 {
        self.days.saturating_mul(SECONDS_PER_DAY)
    }
}

/// Lazy entry reader over any buffered stream.
///
/// Holds the underlying stream open until dropped. Once a line fails to
/// parse (or a read fails), the reader is exhausted for good.
#[derive(Debug)]
pub struct EntryReader<R> {
    input: R,
    done: bool,
}

impl EntryReader<BufReader<File>> {
    /// Open an expiry-list file. This is the run's only fatal error path.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| SweepError::EntriesOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EntryReader<R> {
    /// Wrap an already-open stream.
    pub fn new(input: R) -> Self {
        Self { input, done: false }
    }

    fn next_entry(&mut self) -> Option<ExpireEntry> {
        if self.done {
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                self.done = true;
                return None;
            }
            Ok(_) => {}
        }
        let parsed = parse_line(&line);
        if parsed.is_none() {
            self.done = true;
        }
        parsed
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = ExpireEntry;

    fn next(&mut self) -> Option<ExpireEntry> {
        self.next_entry()
    }
}

/// Parse one `<directory> <days>` line. Returns `None` for anything that is
/// not exactly two fields with an integer second field.
fn parse_line(line: &str) -> Option<ExpireEntry> {
    let mut fields = line.split_whitespace();
    let dir = fields.next()?;
    let days = fields.next()?.parse::<i64>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(ExpireEntry {
        dir: PathBuf::from(dir),
        days,
    })
}
