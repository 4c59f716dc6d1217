//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::ExpiringLruCache;
use crate::error::Result;

const DEFAULT_CAPACITY: usize = 1000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: Option<u64>,
    /// Interval in milliseconds for the optional prune task
    pub prune_interval_ms: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: none)
    /// - `CACHE_PRUNE_INTERVAL_MS` - Prune task interval in milliseconds (default: none)
    ///
    /// Values that fail to parse fall back to their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            capacity: lookup("CACHE_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            default_ttl_ms: lookup("CACHE_DEFAULT_TTL_MS").and_then(|v| v.parse().ok()),
            prune_interval_ms: lookup("CACHE_PRUNE_INTERVAL_MS").and_then(|v| v.parse().ok()),
        }
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_ms.map(Duration::from_millis)
    }

    /// Interval for `spawn_prune_task`, if one is configured.
    pub fn prune_interval(&self) -> Option<Duration> {
        self.prune_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Creates a cache with these parameters.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the capacity or default TTL is zero.
    pub fn build_cache<K, V>(&self) -> Result<ExpiringLruCache<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        ExpiringLruCache::new(self.capacity, self.default_ttl())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl_ms: None,
            prune_interval_ms: None,
        }
    }
}
