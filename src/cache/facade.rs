//! Cache Facade Module
//!
//! The public operation surface composing the entry store, key registry and
//! singleflight coordinator. All shared mutation goes through this facade;
//! store and registry are mutated in lockstep under one write lock so the
//! registry never omits a live key.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{
    CacheStats, EntryStore, FlightGroup, FlightTicket, KeyRegistry, Lookup, Ttl,
};
use crate::error::{CacheError, Result};

// == Shared State ==
/// Store, registry and stats, guarded together.
#[derive(Debug, Default)]
struct Inner<V> {
    store: EntryStore<V>,
    registry: KeyRegistry,
    stats: CacheStats,
}

impl<V: Clone> Inner<V> {
    /// Probes the store, untracking and accounting for a lazily removed
    /// expired entry. Does not touch hit/miss counters.
    fn lookup(&mut self, key: &str) -> Lookup<V> {
        let result = self.store.get(key);
        if matches!(result, Lookup::Expired) {
            self.registry.untrack(key);
            self.stats.record_expired(1);
            self.stats.set_entries(self.store.len());
        }
        result
    }

    fn insert(&mut self, key: String, value: V, ttl: Ttl) {
        // Track first so the registry stays a superset of live keys
        self.registry.track(key.clone());
        self.store.set(key, value, ttl);
        self.stats.set_entries(self.store.len());
    }

    fn remove(&mut self, key: &str) -> bool {
        let existed = self.store.remove(key);
        self.registry.untrack(key);
        self.stats.set_entries(self.store.len());
        existed
    }

    fn remove_prefix(&mut self, prefix: &str) -> usize {
        let matches: Vec<String> = self
            .registry
            .keys_with_prefix(prefix)
            .map(str::to_string)
            .collect();

        let mut removed = 0;
        for key in &matches {
            if self.store.remove(key) {
                removed += 1;
            }
            self.registry.untrack(key);
        }
        self.stats.set_entries(self.store.len());
        removed
    }

    fn clear(&mut self) -> usize {
        let removed = self.store.len();
        self.store.clear();
        self.registry.clear();
        self.stats.set_entries(0);
        removed
    }

    fn purge_expired(&mut self) -> usize {
        let removed = self.store.purge_expired();
        for key in &removed {
            self.registry.untrack(key);
        }
        self.stats.record_expired(removed.len() as u64);
        self.stats.set_entries(self.store.len());
        removed.len()
    }
}

// == Cache ==
/// Get-or-populate cache with tiered expirations, per-key single-flight
/// population and prefix invalidation.
///
/// The handle is cheap to clone; clones share the same state. There is no
/// hidden global instance; whatever composes the process owns the cache's
/// lifetime.
#[derive(Debug)]
pub struct Cache<V> {
    inner: Arc<RwLock<Inner<V>>>,
    flights: FlightGroup<V>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            flights: self.flights.clone(),
        }
    }
}

impl<V> Default for Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                store: EntryStore::new(),
                registry: KeyRegistry::new(),
                stats: CacheStats::new(),
            })),
            flights: FlightGroup::new(),
        }
    }

    // == Get ==
    /// Returns a clone of the live value for a key, or `None`.
    ///
    /// An expired entry behaves as a miss and is removed before returning.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.write().await;
        match guard.lookup(key) {
            Lookup::Hit(value) => {
                guard.stats.record_hit();
                Some(value)
            }
            Lookup::Expired | Lookup::Miss => {
                guard.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Inserts or replaces the value for a key. Last set wins.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Ttl) {
        self.inner.write().await.insert(key.into(), value, ttl);
    }

    // == Get Or Create ==
    /// Returns the cached value for a key, populating it via `factory` on a
    /// miss.
    ///
    /// Concurrent calls for the same absent key run the factory exactly once;
    /// every caller receives the identical value, or the identical error if
    /// the factory fails (in which case nothing is cached and a later call
    /// retries). The population runs in a detached task, so a caller that
    /// stops waiting never cancels it for the others.
    pub async fn get_or_create<F, Fut>(&self, key: &str, ttl: Ttl, factory: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        match self.flights.begin(key).await {
            FlightTicket::Waiter(rx) => {
                self.inner.write().await.stats.record_coalesced_wait();
                self.flights.wait(key, rx).await
            }
            FlightTicket::Leader { tx, rx } => {
                // A population may have landed between the probe and the
                // ticket; serve it instead of recomputing.
                let landed = self.inner.write().await.lookup(key);
                if let Lookup::Hit(value) = landed {
                    self.flights.finish(key, tx, Ok(value.clone())).await;
                    return Ok(value);
                }

                self.inner.write().await.stats.record_population();

                let work = tokio::spawn(factory());
                let inner = Arc::clone(&self.inner);
                let flights = self.flights.clone();
                let key_owned = key.to_string();
                tokio::spawn(async move {
                    let outcome = match work.await {
                        Ok(Ok(value)) => {
                            inner
                                .write()
                                .await
                                .insert(key_owned.clone(), value.clone(), ttl);
                            Ok(value)
                        }
                        Ok(Err(cause)) => {
                            warn!(key = %key_owned, error = %cause, "population factory failed");
                            Err(CacheError::factory(key_owned.clone(), cause))
                        }
                        Err(join_error) => {
                            warn!(key = %key_owned, "population task did not complete");
                            Err(CacheError::factory(
                                key_owned.clone(),
                                anyhow::anyhow!("population task failed: {join_error}"),
                            ))
                        }
                    };
                    flights.finish(&key_owned, tx, outcome).await;
                });

                self.flights.wait(key, rx).await
            }
        }
    }

    // == Remove ==
    /// Removes the entry for a key. Idempotent; returns whether an entry
    /// physically existed.
    pub async fn remove(&self, key: &str) -> bool {
        self.inner.write().await.remove(key)
    }

    // == Remove By Prefix ==
    /// Removes every tracked key with the given byte-prefix, returning the
    /// number of entries removed.
    ///
    /// Safe to call while the same keys are being repopulated; a removed key
    /// simply misses and repopulates on its next access.
    pub async fn remove_by_prefix(&self, prefix: &str) -> usize {
        self.inner.write().await.remove_prefix(prefix)
    }

    // == Clear ==
    /// Removes every entry and empties the registry, returning the number of
    /// entries removed.
    pub async fn clear(&self) -> usize {
        self.inner.write().await.clear()
    }

    // == Exists ==
    /// Same liveness semantics as [`Cache::get`] without cloning the value.
    pub async fn exists(&self, key: &str) -> bool {
        let mut guard = self.inner.write().await;
        match guard.store.contains(key) {
            Lookup::Hit(()) => {
                guard.stats.record_hit();
                true
            }
            Lookup::Expired => {
                guard.registry.untrack(key);
                guard.stats.record_expired(1);
                let entries = guard.store.len();
                guard.stats.set_entries(entries);
                guard.stats.record_miss();
                false
            }
            Lookup::Miss => {
                guard.stats.record_miss();
                false
            }
        }
    }

    // == Purge Expired ==
    /// Removes every expired entry and untracks its key, returning the count.
    pub async fn purge_expired(&self) -> usize {
        self.inner.write().await.purge_expired()
    }

    // == Length ==
    /// Returns the number of physically present entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.store.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.store.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the performance counters.
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats.clone()
    }
}
