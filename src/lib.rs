#![forbid(unsafe_code)]

//! Temp Sweeper (tsw): directory-expiry sweeper.
//!
//! Reads a line-oriented expiry list of `<directory> <days>` pairs, then
//! recursively walks each tree and deletes entries whose last-modified
//! timestamp is older than the retention window. Entries can be processed
//! sequentially or fanned out one thread per entry.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use tempsweeper::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use tempsweeper::sweeper::entries::EntryReader;
//! use tempsweeper::sweeper::scheduler::{DispatchMode, Scheduler};
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod sweeper;
