//! Cache Store Module
//!
//! Main cache engine combining a hash index with an arena-backed recency
//! order and per-entry TTL expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, MonotonicClock, NodeId, RecencyList};
use crate::error::{CacheError, Result};

// == Expiring LRU Cache ==
/// Bounded key-value store with LRU eviction and TTL expiration.
///
/// The index and the recency order always hold the same set of keys.
/// Expired entries keep their slot (and count toward `len`) until a `get`,
/// `put`, `prune` or `clear` touches them.
#[derive(Debug)]
pub struct ExpiringLruCache<K, V, C = MonotonicClock> {
    /// Key to recency-order node
    index: HashMap<K, NodeId>,
    /// Entries, least recently used first
    order: RecencyList<CacheEntry<K, V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries put without an explicit one
    default_ttl: Option<Duration>,
    clock: C,
}

impl<K, V> ExpiringLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a cache on the monotonic system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be non-zero
    /// * `default_ttl` - TTL for entries put without one; None = never expire
    ///
    /// # Errors
    /// `InvalidConfiguration` if `capacity` is zero or `default_ttl` is zero.
    pub fn new(capacity: usize, default_ttl: Option<Duration>) -> Result<Self> {
        Self::with_clock(capacity, default_ttl, MonotonicClock)
    }
}

impl<K, V, C> ExpiringLruCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, default_ttl: Option<Duration>, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be a positive integer".to_string(),
            ));
        }
        if default_ttl == Some(Duration::ZERO) {
            return Err(CacheError::InvalidConfiguration(
                "default TTL, if provided, must be a positive duration".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
            clock,
        })
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();

        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .order
            .get(id)
            .map_or(true, |entry| entry.is_expired(now));
        if expired {
            self.index.remove(key);
            self.order.remove(id);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(len = self.order.len(), "removed expired entry on access");
            return None;
        }

        self.order.move_to_back(id);
        self.stats.record_hit();
        self.order.get(id).map(|entry| &entry.value)
    }

    // == Put ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists (expired or not) its value and deadline are
    /// replaced and it becomes most recently used. If the key is new and the
    /// cache is full, the least recently used entry is evicted first.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - TTL for this entry; falls back to the default TTL if None
    ///
    /// # Errors
    /// `InvalidArgument` if `ttl` is zero. The cache is left untouched.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        if ttl == Some(Duration::ZERO) {
            return Err(CacheError::InvalidArgument(
                "entry TTL, if provided, must be a positive duration".to_string(),
            ));
        }

        let now = self.clock.now();
        // A deadline past the end of representable time never expires
        let expires_at = ttl
            .or(self.default_ttl)
            .and_then(|ttl| now.checked_add(ttl));

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
                entry.expires_at = expires_at;
            }
            self.order.move_to_back(id);
            return Ok(());
        }

        if self.order.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self
            .order
            .push_back(CacheEntry::new(key.clone(), value, expires_at));
        self.index.insert(key, id);

        Ok(())
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    ///
    /// Expired-but-unpurged entries are removed too and yield None.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let id = self.index.remove(key)?;
        let entry = self.order.remove(id)?;
        if entry.is_expired(now) {
            self.stats.record_expirations(1);
            None
        } else {
            Some(entry.value)
        }
    }

    // == Prune ==
    /// Removes all expired entries from the cache.
    ///
    /// Live entries keep their relative recency order. Returns the number of
    /// entries removed.
    pub fn prune(&mut self) -> usize {
        let now = self.clock.now();
        let expired: Vec<NodeId> = self
            .order
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(id, _)| id)
            .collect();

        let count = expired.len();
        for id in expired {
            if let Some(entry) = self.order.remove(id) {
                self.index.remove(&entry.key);
            }
        }

        self.stats.record_expirations(count);
        debug!(removed = count, len = self.order.len(), "pruned expired entries");
        count
    }

    // == Clear ==
    /// Drops every entry. Capacity, default TTL and statistics are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    // == Contains Key ==
    /// Checks whether `key` occupies a slot, without promoting it or
    /// checking its deadline.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == TTL Remaining ==
    /// Returns how long `key` has left to live.
    ///
    /// None if the key is absent or never expires; `Some(Duration::ZERO)` if
    /// it has lapsed but has not been purged yet.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.get(key)?;
        self.order.get(*id)?.ttl_remaining(self.clock.now())
    }

    // == Keys ==
    /// Iterates keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter().map(|(_, entry)| &entry.key)
    }

    // == Length ==
    /// Returns the number of occupied slots, expired entries included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.order.pop_front() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            debug!(capacity = self.capacity, "evicted least recently used entry");
        }
    }
}
