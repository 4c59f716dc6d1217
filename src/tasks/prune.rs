//! Prune Task
//!
//! Background task that periodically removes expired cache entries.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Clock, ExpiringLruCache};

/// Spawns a task that calls `prune` on the cache every `interval`.
///
/// The cache is shared through `Rc<RefCell<_>>`, so the task runs on the
/// current thread and must be spawned from inside a `tokio::task::LocalSet`.
/// The borrow is taken and released within each tick, never across an
/// await, so callers may use the cache freely between ticks.
///
/// # Arguments
/// * `cache` - Shared handle to the cache
/// * `interval` - Delay between prune runs
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop pruning.
///
/// # Panics
/// If called outside a `LocalSet`.
///
/// # Example
/// ```ignore
/// let local = tokio::task::LocalSet::new();
/// local.run_until(async {
///     let cache = Rc::new(RefCell::new(ExpiringLruCache::new(1000, None)?));
///     let handle = spawn_prune_task(cache.clone(), Duration::from_secs(1));
///     // Later, during shutdown:
///     handle.abort();
/// }).await;
/// ```
pub fn spawn_prune_task<K, V, C>(
    cache: Rc<RefCell<ExpiringLruCache<K, V, C>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + 'static,
    V: 'static,
    C: Clock + 'static,
{
    tokio::task::spawn_local(async move {
        info!(?interval, "starting prune task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.borrow_mut().prune();

            if removed > 0 {
                info!(removed, "prune task removed expired entries");
            } else {
                debug!("prune task found no expired entries");
            }
        }
    })
}
