//! Expiry engine: entry source, tree sweeper, dispatch scheduler.

pub mod entries;
pub mod scheduler;
pub mod tree;
