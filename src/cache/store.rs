//! Entry Store Module
//!
//! The physical holder of cached values. Expired entries are logically absent:
//! any read that observes one removes it and reports a miss.

use std::collections::HashMap;

use crate::cache::{CacheEntry, Ttl};

// == Lookup Outcome ==
/// Result of probing the store for a key.
///
/// `Expired` is distinguished from `Miss` so the facade can untrack the key
/// and account for the lazy removal; both behave as "absent" to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// A live entry was found.
    Hit(T),
    /// An expired entry was observed and removed as a side effect.
    Expired,
    /// No entry exists for the key.
    Miss,
}

impl<T> Lookup<T> {
    /// Returns true only for a live hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

// == Entry Store ==
/// Keyed storage of cache entries with time-based expiry.
///
/// The store is not synchronized; the facade serializes access to it. There is
/// no capacity bound and no eviction beyond expiry.
#[derive(Debug, Default)]
pub struct EntryStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> EntryStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Get ==
    /// Retrieves a clone of the live value for a key.
    ///
    /// Observing an expired entry deletes it before returning `Expired`.
    pub fn get(&mut self, key: &str) -> Lookup<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                Lookup::Expired
            }
            Some(entry) => Lookup::Hit(entry.value.clone()),
            None => Lookup::Miss,
        }
    }

    // == Contains ==
    /// Same liveness semantics as [`EntryStore::get`] without cloning the
    /// value.
    pub fn contains(&mut self, key: &str) -> Lookup<()> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                Lookup::Expired
            }
            Some(_) => Lookup::Hit(()),
            None => Lookup::Miss,
        }
    }

    // == Set ==
    /// Inserts or replaces the entry for a key.
    ///
    /// Both the value and the expiry are overwritten unconditionally.
    pub fn set(&mut self, key: String, value: V, ttl: Ttl) {
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    // == Remove ==
    /// Removes the entry for a key, reporting whether one physically existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Purge Expired ==
    /// Removes every expired entry, returning the removed keys so the caller
    /// can untrack them.
    pub fn purge_expired(&mut self) -> Vec<String> {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
        }

        expired
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    /// Returns the number of physically present entries, expired ones
    /// included until they are observed or purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
