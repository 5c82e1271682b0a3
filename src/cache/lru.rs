//! Usage Order Module
//!
//! Implements least-recently-used tracking as an intrusive doubly-linked list
//! threaded through the store's own entry map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Usage Order ==
/// Tracks access order for LRU eviction.
///
/// The list nodes are the entries of the key→entry map passed to each call;
/// every entry's `older`/`newer` fields hold neighbouring keys. Only the two
/// endpoints live here:
/// - `oldest` = least recently used, first eviction candidate
/// - `newest` = most recently used
#[derive(Debug)]
pub struct UsageOrder<K> {
    oldest: Option<K>,
    newest: Option<K>,
}

impl<K> Default for UsageOrder<K> {
    fn default() -> Self {
        Self {
            oldest: None,
            newest: None,
        }
    }
}

impl<K: Clone + Eq + Hash> UsageOrder<K> {
    // == Constructor ==
    /// Creates a new empty usage order.
    pub fn new() -> Self {
        Self::default()
    }

    // == Append ==
    /// Links `key` in as the most recently used entry.
    ///
    /// The entry must already be in `entries` and fully detached. Anything
    /// else is refused with `InvariantViolation` before a link is touched.
    pub fn append<V>(
        &mut self,
        entries: &mut HashMap<K, CacheEntry<K, V>>,
        key: &K,
    ) -> Result<()> {
        let entry = entries.get(key).ok_or_else(|| {
            CacheError::InvariantViolation("cannot append a key with no entry".to_string())
        })?;
        if entry.is_linked() || self.newest.as_ref() == Some(key) {
            return Err(CacheError::InvariantViolation(
                "tried to append a use without removing it first".to_string(),
            ));
        }

        match self.newest.clone() {
            None => self.oldest = Some(key.clone()),
            Some(previous) => {
                let Some(previous_entry) = entries.get_mut(&previous) else {
                    return Err(CacheError::InvariantViolation(
                        "newest key has no entry".to_string(),
                    ));
                };
                previous_entry.newer = Some(key.clone());
                if let Some(entry) = entries.get_mut(key) {
                    entry.older = Some(previous);
                }
            }
        }
        self.newest = Some(key.clone());
        Ok(())
    }

    // == Detach ==
    /// Unlinks `key` from wherever it sits, joining its neighbours.
    ///
    /// Clears the entry's own links. Detaching an unknown or already detached
    /// key leaves the list untouched.
    pub fn detach<Q, V>(&mut self, entries: &mut HashMap<K, CacheEntry<K, V>>, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        let older = entry.older.take();
        let newer = entry.newer.take();

        match &older {
            Some(older_key) => {
                if let Some(older_entry) = entries.get_mut::<K>(older_key) {
                    older_entry.newer = newer.clone();
                }
            }
            None => {
                if is_key(&self.oldest, key) {
                    self.oldest = newer.clone();
                }
            }
        }

        match &newer {
            Some(newer_key) => {
                if let Some(newer_entry) = entries.get_mut::<K>(newer_key) {
                    newer_entry.older = older;
                }
            }
            None => {
                if is_key(&self.newest, key) {
                    self.newest = older;
                }
            }
        }
    }

    // == Oldest / Newest ==
    /// Returns the least recently used key.
    pub fn oldest(&self) -> Option<&K> {
        self.oldest.as_ref()
    }

    /// Returns the most recently used key.
    pub fn newest(&self) -> Option<&K> {
        self.newest.as_ref()
    }

    // == Clear ==
    /// Forgets both endpoints. The caller drops the entries.
    pub fn clear(&mut self) {
        self.oldest = None;
        self.newest = None;
    }

    // == Keys ==
    /// Walks the list from oldest to newest.
    pub fn keys<V>(&self, entries: &HashMap<K, CacheEntry<K, V>>) -> Vec<K> {
        let mut keys = Vec::with_capacity(entries.len());
        let mut cursor = self.oldest.clone();
        while let Some(key) = cursor {
            // A cycle would mean the links are corrupt; stop rather than spin.
            if keys.len() > entries.len() {
                break;
            }
            cursor = entries.get(&key).and_then(|entry| entry.newer.clone());
            keys.push(key);
        }
        keys
    }
}

fn is_key<K, Q>(slot: &Option<K>, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    slot.as_ref().is_some_and(|held| <K as Borrow<Q>>::borrow(held) == key)
}
