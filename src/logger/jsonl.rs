//! Append-only JSONL audit sink with graceful degradation.
//!
//! The sink never takes the run down: if the file cannot be opened or a
//! write fails, it reports once on stderr and disables itself. The console
//! surface keeps working either way.

#![allow(missing_docs)]

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

// ──────────────────── record ────────────────────

/// One audit line. Unused fields are omitted from the serialized record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub ts: String,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl AuditRecord {
    /// New record stamped with the current UTC time.
    #[must_use]
    pub fn new(event: &'static str) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event,
            path: None,
            error: None,
            entries: None,
            deleted: None,
            failed: None,
            duration_ms: None,
        }
    }
}

// ──────────────────── writer ────────────────────

/// Append-only writer owned by the logger thread.
pub struct JsonlWriter {
    path: PathBuf,
    out: Option<BufWriter<File>>,
}

impl JsonlWriter {
    /// Open the audit file for appending, creating it if needed.
    ///
    /// An open failure disables the sink rather than failing the run.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let out = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(BufWriter::new(file)),
            Err(e) => {
                eprintln!("[TSW-LOG] cannot open audit log {}: {e}", path.display());
                None
            }
        };
        Self {
            path: path.to_path_buf(),
            out,
        }
    }

    /// Whether the sink is still accepting records.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.out.is_some()
    }

    /// Append one record as a single JSON line.
    pub fn append(&mut self, record: &AuditRecord) {
        let Some(out) = &mut self.out else {
            return;
        };
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("[TSW-LOG] cannot serialize audit record: {e}");
                return;
            }
        };
        if let Err(e) = writeln!(out, "{line}") {
            eprintln!(
                "[TSW-LOG] write to audit log {} failed, disabling: {e}",
                self.path.display()
            );
            self.out = None;
        }
    }

    /// Flush buffered records to disk.
    pub fn flush(&mut self) {
        if let Some(out) = &mut self.out
            && let Err(e) = out.flush()
        {
            eprintln!(
                "[TSW-LOG] flush of audit log {} failed: {e}",
                self.path.display()
            );
        }
    }
}

// ──────────────────── tests ────────────────────
