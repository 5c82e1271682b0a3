//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support and
//! the usage-order links threading them together.

use std::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value, expiration and recency links.
///
/// `older` and `newer` name neighbouring keys in the same store; they never
/// own anything.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = no expiration
    pub expire_at: Option<Instant>,
    /// Next less recently used key
    pub(crate) older: Option<K>,
    /// Next more recently used key
    pub(crate) newer: Option<K>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new, unlinked cache entry.
    pub fn new(value: V, expire_at: Option<Instant>) -> Self {
        Self {
            value,
            expire_at,
            older: None,
            newer: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches its expiration instant.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expire_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Returns true if either recency link is set.
    pub(crate) fn is_linked(&self) -> bool {
        self.older.is_some() || self.newer.is_some()
    }
}
