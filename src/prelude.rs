//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use tempsweeper::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SweepError};

// Logger
pub use crate::logger::{LoggerConfig, Reporter, SweepEvent, spawn_logger};

// Sweeper
pub use crate::sweeper::entries::{EntryReader, ExpireEntry};
pub use crate::sweeper::scheduler::{DispatchMode, RunSummary, Scheduler, TaskGroup};
pub use crate::sweeper::tree::{SweepStats, TreeSweeper};
