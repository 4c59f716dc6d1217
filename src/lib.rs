//! Expiring LRU - a bounded in-memory cache
//!
//! Evicts the least recently used entry when full and expires entries whose
//! time-to-live has elapsed, whichever comes first.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, Clock, ExpiringLruCache, ManualClock, MonotonicClock};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_prune_task;
