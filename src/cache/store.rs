//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with usage-order tracking and
//! epoch-bucketed TTL expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheStats, Clock, ExpirationScheduler, SystemClock, UsageOrder,
};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::{CacheOptions, SetOptions};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// Not synchronized: wrap it in a lock (as `Cache` does) before sharing it
/// with the background sweeper or across threads.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage, also the arena for the usage-order links
    entries: HashMap<K, CacheEntry<K, V>>,
    /// LRU access order
    usage: UsageOrder<K>,
    /// Pending TTL checks grouped by epoch
    scheduler: ExpirationScheduler<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed, None = unbounded
    limit: Option<usize>,
    /// TTL for entries set without one
    default_expire_in: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl<K, V> CacheStore<K, V>
where
    K: Clone + Eq + Hash,
{
    // == Constructor ==
    /// Creates a new CacheStore reading time from the system clock.
    pub fn new(options: &CacheOptions, config: &CacheConfig) -> Result<Self> {
        Self::with_clock(options, config, Arc::new(SystemClock))
    }

    /// Creates a new CacheStore reading time from `clock`.
    ///
    /// The clock's current instant becomes the inception of epoch numbering.
    pub fn with_clock(
        options: &CacheOptions,
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let interval = options.eviction_interval(config)?;
        Ok(Self {
            entries: HashMap::new(),
            usage: UsageOrder::new(),
            scheduler: ExpirationScheduler::new(clock.now(), interval),
            stats: CacheStats::new(),
            limit: options.limit,
            default_expire_in: config.default_expire_in,
            clock,
        })
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used.
    ///
    /// An entry whose TTL has passed is removed here and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.expire_if_due(key, now);

        let Some(owned) = self.entries.get_key_value(key).map(|(k, _)| k.clone()) else {
            self.stats.record_miss();
            return None;
        };

        self.usage.detach(&mut self.entries, key);
        let promoted = self.usage.append(&mut self.entries, &owned);
        debug_assert!(promoted.is_ok(), "detached entry must re-append: {:?}", promoted);
        self.stats.record_hit();
        self.entries.get(key).map(|entry| &entry.value)
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// `options` is a `SetOptions`, a `Duration`, or a bare millisecond count.
    /// A negative TTL is rejected before anything changes. Overwriting a key
    /// replaces its value and expiration and marks it most recently used.
    /// Afterwards, least recently used entries are evicted until the store
    /// is within its limit, which may include the key just written.
    pub fn set(&mut self, key: K, value: V, options: impl Into<SetOptions>) -> Result<()> {
        let expire_in = options.into().resolve(self.default_expire_in)?;
        let now = self.clock.now();
        let expire_at = expire_in.and_then(|ttl| now.checked_add(ttl));

        self.usage.detach(&mut self.entries, &key);
        self.entries.insert(key.clone(), CacheEntry::new(value, expire_at));
        if let Some(at) = expire_at {
            self.scheduler.schedule(key.clone(), at);
        }
        self.usage.append(&mut self.entries, &key)?;

        self.evict_surplus();
        Ok(())
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.usage.detach(&mut self.entries, key);
        self.entries.remove(key).map(|entry| entry.value)
    }

    // == Clear ==
    /// Drops every entry and all pending expiration bookkeeping.
    ///
    /// Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.usage.clear();
        self.scheduler.clear();
        debug!("Cache cleared");
    }

    // == Sweep ==
    /// Removes entries whose expiration epoch has fully elapsed.
    ///
    /// Only buckets filled since the previous sweep are visited, and every
    /// candidate is re-checked against its current expiration, so entries
    /// re-set with a later TTL survive. Returns the number removed.
    pub fn sweep(&mut self) -> usize {
        let now = self.clock.now();
        let candidates = self.scheduler.take_due(now);
        let checked = candidates.len();

        let removed = candidates
            .iter()
            .filter(|key| self.expire_if_due(*key, now))
            .count();

        debug!(checked, removed, "Expiration sweep finished");
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks for a key without promoting it or checking its expiration.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.usage.keys(&self.entries)
    }

    /// Counts entries by walking the usage order; always equals `len()`.
    pub fn count_entries(&self) -> usize {
        self.keys_by_recency().len()
    }

    /// Number of epochs holding scheduled expiration checks.
    pub fn pending_epochs(&self) -> usize {
        self.scheduler.pending_epochs()
    }

    /// Capacity limit, or `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Epoch width and sweep cadence.
    pub fn eviction_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    fn expire_if_due<Q>(&mut self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let due = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now));
        if due {
            self.remove(key);
            self.stats.record_expiration();
        }
        due
    }

    fn evict_surplus(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.entries.len() > limit {
            let Some(oldest) = self.usage.oldest().cloned() else {
                break;
            };
            self.remove(&oldest);
            self.stats.record_eviction();
        }
        debug!(limit, len = self.entries.len(), "Capacity enforced");
    }
}
