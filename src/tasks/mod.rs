//! Background Tasks Module
//!
//! Contains opt-in maintenance tasks for a cache.
//!
//! # Tasks
//! - Prune: removes expired cache entries at a fixed interval

mod prune;

pub use prune::spawn_prune_task;
