//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use entry::CacheEntry;
pub use lru::{Iter, NodeId, RecencyList};
pub use stats::CacheStats;
pub use store::ExpiringLruCache;
