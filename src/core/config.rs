//! Settings: optional TOML file + env var override + compiled defaults.
//!
//! This is runtime tuning only. The expiry list itself (which directories to
//! sweep, and for how many days) is a separate line-oriented file read by
//! [`crate::sweeper::entries::EntryReader`].

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SweepError};

/// Default expiry-list filename, resolved relative to the working directory.
pub const DEFAULT_ENTRIES_FILE: &str = "tempsweeper.conf";

/// Default settings filename, resolved relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "tempsweeper.toml";

/// Env var naming an alternative settings file.
pub const SETTINGS_ENV: &str = "TEMPSWEEPER_SETTINGS";

/// Full settings model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub sweep: SweepConfig,
    pub log: LogConfig,
}

/// Sweep run defaults; each is overridable from the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SweepConfig {
    /// Path of the line-oriented expiry list.
    pub entries_file: PathBuf,
    /// Process entries concurrently (one thread per entry).
    pub concurrent: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            entries_file: PathBuf::from(DEFAULT_ENTRIES_FILE),
            concurrent: true,
        }
    }
}

/// Audit logging sinks. The console surface is always active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Append one JSON record per sweep event to this file. `None` disables
    /// the audit sink.
    pub jsonl_path: Option<PathBuf>,
}

impl Config {
    /// Load settings.
    ///
    /// Resolution order: an explicit path (missing file is an error), then
    /// `$TEMPSWEEPER_SETTINGS`, then `./tempsweeper.toml` if present, then
    /// compiled defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(SETTINGS_ENV).map(PathBuf::from) {
            return Self::from_file(&path);
        }
        let default = Path::new(DEFAULT_SETTINGS_FILE);
        if default.exists() {
            Self::from_file(default)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SweepError::MissingSettings {
                    path: path.to_path_buf(),
                }
            } else {
                SweepError::io(path, source)
            }
        })?;
        Ok(toml::from_str(&text)?)
    }
}
