//! TSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Top-level error type for Temp Sweeper.
///
/// Only the entries-file and settings failures are ever fatal; everything
/// that happens during a sweep is reported through the event log and stays
/// local to its subtree.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("[TSW-1001] cannot open expiry list {path}: {source}")]
    EntriesOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[TSW-1002] missing settings file: {path}")]
    MissingSettings { path: PathBuf },

    #[error("[TSW-1003] settings parse failure in {context}: {details}")]
    SettingsParse {
        context: &'static str,
        details: String,
    },

    #[error("[TSW-2001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[TSW-3001] runtime failure: {details}")]
    Runtime { details: String },
}

impl SweepError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EntriesOpen { .. } => "TSW-1001",
            Self::MissingSettings { .. } => "TSW-1002",
            Self::SettingsParse { .. } => "TSW-1003",
            Self::Io { .. } => "TSW-2001",
            Self::Runtime { .. } => "TSW-3001",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(value: toml::de::Error) -> Self {
        Self::SettingsParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
