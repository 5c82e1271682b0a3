//! Cache Handle
//!
//! The object returned by `create_cache`: a locked store plus the sweeper
//! that keeps its expiration buckets drained.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{CacheOptions, SetOptions};
use crate::tasks::{lock_store, spawn_sweeper, SharedStore, SweeperHandle};

/// Creates a cache using host defaults loaded from the environment.
///
/// Inside a tokio runtime the background sweeper starts immediately;
/// elsewhere the cache relies on lazy expiration and explicit `sweep` calls.
pub fn create_cache<K, V>(options: CacheOptions) -> Result<Cache<K, V>>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    Cache::with_config(options, &CacheConfig::from_env())
}

// == Cache ==
/// Thread-safe cache handle.
///
/// Each instance is independent. Dropping it (or calling `dispose`) stops
/// its sweeper.
#[derive(Debug)]
pub struct Cache<K, V> {
    store: SharedStore<K, V>,
    sweeper: Option<SweeperHandle>,
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    pub fn with_config(options: CacheOptions, config: &CacheConfig) -> Result<Self> {
        Self::with_clock(options, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        options: CacheOptions,
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let store = CacheStore::with_clock(&options, config, clock)?;
        let interval = store.eviction_interval();
        let store = Arc::new(Mutex::new(store));

        let sweeper = match Handle::try_current() {
            Ok(_) => Some(SweeperHandle::new(spawn_sweeper(
                Arc::downgrade(&store),
                interval,
            ))),
            Err(_) => {
                warn!("No tokio runtime available, expiration sweeper not started");
                None
            }
        };

        Ok(Self { store, sweeper })
    }

    /// Returns a copy of the value for `key`, if present and not expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        lock_store(&self.store).get(key).cloned()
    }

    /// Stores `value` under `key`; see `CacheStore::set`.
    pub fn set(&self, key: K, value: V, options: impl Into<SetOptions>) -> Result<()> {
        lock_store(&self.store).set(key, value, options)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        lock_store(&self.store).remove(key)
    }

    /// Drops every entry and pending expiration; statistics are kept.
    pub fn clear(&self) {
        lock_store(&self.store).clear();
    }

    /// Runs one expiration sweep now, returning the number removed.
    pub fn sweep(&self) -> usize {
        lock_store(&self.store).sweep()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        lock_store(&self.store).len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        lock_store(&self.store).is_empty()
    }

    /// Checks for `key` without promoting it or expiring it.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        lock_store(&self.store).contains_key(key)
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        lock_store(&self.store).keys_by_recency()
    }

    /// Snapshot of the hit/miss/eviction/expiration counters.
    pub fn stats(&self) -> CacheStats {
        lock_store(&self.store).stats()
    }

    /// Capacity limit, or `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        lock_store(&self.store).limit()
    }

    /// True while a background sweeper is attached and running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    /// Stops the background sweeper, leaving the contents usable.
    pub fn stop_sweeper(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.stop();
            info!("Expiration sweeper stopped");
        }
    }

    /// Stops the sweeper and releases the cache.
    pub fn dispose(mut self) {
        self.stop_sweeper();
    }
}
