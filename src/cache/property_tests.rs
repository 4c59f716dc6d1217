//! Property-Based Tests for Cache Module
//!
//! Uses proptest to drive the cache and a naive reference model through the
//! same operation sequences and compare every observable result.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::cache::{ExpiringLruCache, ManualClock};

// == Reference Model ==
/// Vec-backed LRU: index 0 is least recently used. Time is in milliseconds.
#[derive(Debug)]
struct Model {
    capacity: usize,
    default_ttl: Option<u64>,
    now: u64,
    entries: Vec<(u8, u32, Option<u64>)>,
}

impl Model {
    fn new(capacity: usize, default_ttl: Option<u64>) -> Self {
        Self {
            capacity,
            default_ttl,
            now: 0,
            entries: Vec::new(),
        }
    }

    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _, _)| *k == key)
    }

    fn is_expired(&self, expires_at: Option<u64>) -> bool {
        expires_at.map_or(false, |at| at < self.now)
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let pos = self.position(key)?;
        let entry = self.entries.remove(pos);
        if self.is_expired(entry.2) {
            return None;
        }
        self.entries.push(entry);
        Some(entry.1)
    }

    fn put(&mut self, key: u8, value: u32, ttl: Option<u64>) {
        let expires_at = ttl.or(self.default_ttl).map(|ttl| self.now + ttl);
        if let Some(pos) = self.position(key) {
            self.entries.remove(pos);
        } else if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }
        self.entries.push((key, value, expires_at));
    }

    fn prune(&mut self) -> usize {
        let before = self.entries.len();
        let now = self.now;
        self.entries
            .retain(|(_, _, expires_at)| expires_at.map_or(true, |at| at >= now));
        before - self.entries.len()
    }

    fn keys(&self) -> Vec<u8> {
        self.entries.iter().map(|(k, _, _)| *k).collect()
    }
}

// == Strategies ==
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: u32, ttl: Option<u64> },
    Get { key: u8 },
    Advance { millis: u64 },
    Prune,
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // A small key space keeps hits, updates and evictions frequent
    prop_oneof![
        4 => (0u8..8, any::<u32>(), prop::option::of(1u64..200))
            .prop_map(|(key, value, ttl)| CacheOp::Put { key, value, ttl }),
        4 => (0u8..8).prop_map(|key| CacheOp::Get { key }),
        2 => (0u64..150).prop_map(|millis| CacheOp::Advance { millis }),
        1 => Just(CacheOp::Prune),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every get, prune count, size and recency order matches the reference
    // model, and size never exceeds capacity.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        default_ttl in prop::option::of(1u64..200),
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let clock = ManualClock::new();
        let mut cache = ExpiringLruCache::with_clock(
            capacity,
            default_ttl.map(Duration::from_millis),
            clock.clone(),
        ).unwrap();
        let mut model = Model::new(capacity, default_ttl);

        for op in ops {
            match op {
                CacheOp::Put { key, value, ttl } => {
                    cache.put(key, value, ttl.map(Duration::from_millis)).unwrap();
                    model.put(key, value, ttl);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key).copied();
                    prop_assert_eq!(got, model.get(key), "get({}) mismatch", key);
                }
                CacheOp::Advance { millis } => {
                    clock.advance(Duration::from_millis(millis));
                    model.now += millis;
                }
                CacheOp::Prune => {
                    prop_assert_eq!(cache.prune(), model.prune(), "prune count mismatch");
                }
                CacheOp::Clear => {
                    cache.clear();
                    model.entries.clear();
                }
            }

            prop_assert!(cache.len() <= capacity, "size exceeded capacity");
            prop_assert_eq!(cache.len(), model.entries.len(), "size mismatch");
            let keys: Vec<u8> = cache.keys().copied().collect();
            prop_assert_eq!(keys, model.keys(), "recency order mismatch");
        }
    }

    // Without TTLs or reads, inserting N+1 distinct keys keeps exactly the
    // last N.
    #[test]
    fn prop_eviction_drops_oldest(
        keys in prop::collection::hash_set(any::<u16>(), 2..40),
    ) {
        let keys: Vec<u16> = keys.into_iter().collect();
        let capacity = keys.len() - 1;
        let mut cache = ExpiringLruCache::new(capacity, None).unwrap();

        for key in &keys {
            cache.put(*key, *key as u32, None).unwrap();
        }

        prop_assert_eq!(cache.len(), capacity);
        prop_assert!(cache.get(&keys[0]).is_none(), "oldest key should be evicted");
        for key in &keys[1..] {
            prop_assert_eq!(cache.get(key), Some(&(*key as u32)));
        }
    }

    // Reading the oldest key before overflowing moves the eviction to the
    // second oldest.
    #[test]
    fn prop_get_protects_from_eviction(
        keys in prop::collection::hash_set(any::<u16>(), 3..40),
    ) {
        let keys: Vec<u16> = keys.into_iter().collect();
        let (last, initial) = keys.split_last().unwrap();
        let mut cache = ExpiringLruCache::new(initial.len(), None).unwrap();

        for key in initial {
            cache.put(*key, (), None).unwrap();
        }
        prop_assert!(cache.get(&initial[0]).is_some());
        cache.put(*last, (), None).unwrap();

        prop_assert!(cache.get(&initial[0]).is_some(), "accessed key was evicted");
        prop_assert!(cache.get(&initial[1]).is_none(), "second oldest should be evicted");
    }

    // Re-putting existing keys never changes size.
    #[test]
    fn prop_overwrite_keeps_size(
        keys in prop::collection::vec(0u8..16, 1..60),
    ) {
        let mut cache = ExpiringLruCache::new(64, None).unwrap();
        let mut distinct = HashSet::new();

        for (i, key) in keys.iter().enumerate() {
            cache.put(*key, i, None).unwrap();
            distinct.insert(*key);
            prop_assert_eq!(cache.len(), distinct.len());
        }
    }
}
