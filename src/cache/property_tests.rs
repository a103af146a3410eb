//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache's correctness properties.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::{Cache, EntryStore, KeyRegistry, Lookup, Ttl};

// == Strategies ==
/// Generates namespaced cache keys (`<domain>:<selector>`)
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-c]{1,4}:[a-z0-9]{1,6}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}"
}

/// Generates a sequence of facade operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Remove { key: String },
    RemoveByPrefix { prefix: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
        "[a-c]{1,2}".prop_map(|prefix| CacheOp::RemoveByPrefix { prefix }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Round-trip: storing a never-expiring value and reading it back yields
    // the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = EntryStore::new();

        store.set(key.clone(), value.clone(), Ttl::Never);

        prop_assert_eq!(store.get(&key), Lookup::Hit(value));
    }

    // Overwrite: the second set for a key fully replaces the first.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = EntryStore::new();

        store.set(key.clone(), value1, Ttl::after_secs(60));
        store.set(key.clone(), value2.clone(), Ttl::Never);

        prop_assert_eq!(store.get(&key), Lookup::Hit(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // Remove is idempotent: the first removal reports the entry, the second
    // reports absence, and neither errors.
    #[test]
    fn prop_remove_idempotent(key in key_strategy(), value in value_strategy()) {
        let mut store = EntryStore::new();

        store.set(key.clone(), value, Ttl::Never);

        prop_assert!(store.remove(&key));
        prop_assert!(!store.remove(&key));
        prop_assert_eq!(store.get(&key), Lookup::Miss);
    }

    // Prefix filtering matches a naive scan over the tracked key set.
    #[test]
    fn prop_prefix_filter_matches_naive(
        keys in prop::collection::hash_set(key_strategy(), 0..30),
        prefix in "[a-c]{0,3}"
    ) {
        let mut registry = KeyRegistry::new();
        for key in &keys {
            registry.track(key.clone());
        }

        let filtered: HashSet<String> = registry
            .keys_with_prefix(&prefix)
            .map(str::to_string)
            .collect();
        let expected: HashSet<String> = keys
            .iter()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        prop_assert_eq!(filtered, expected);
    }

    // Untracked keys never show up in a prefix scan.
    #[test]
    fn prop_untrack_removes_from_prefix_scan(
        keys in prop::collection::hash_set(key_strategy(), 1..20)
    ) {
        let mut registry = KeyRegistry::new();
        for key in &keys {
            registry.track(key.clone());
        }

        for key in &keys {
            registry.untrack(key);
        }

        prop_assert_eq!(registry.keys_with_prefix("").count(), 0);
        prop_assert!(registry.is_empty());
    }

    // Registry superset invariant, observed behaviorally through the facade:
    // after any operation sequence, sweeping the empty prefix removes every
    // physical entry; no entry is orphaned by a missing registry key.
    #[test]
    fn prop_no_orphaned_entries(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache: Cache<String> = Cache::new();

            for op in ops {
                match op {
                    CacheOp::Set { key, value } => cache.set(key, value, Ttl::Never).await,
                    CacheOp::Get { key } => {
                        let _ = cache.get(&key).await;
                    }
                    CacheOp::Remove { key } => {
                        let _ = cache.remove(&key).await;
                    }
                    CacheOp::RemoveByPrefix { prefix } => {
                        let _ = cache.remove_by_prefix(&prefix).await;
                    }
                }
            }

            let entries = cache.len().await;
            let swept = cache.remove_by_prefix("").await;

            prop_assert_eq!(swept, entries, "prefix sweep must reach every entry");
            prop_assert!(cache.is_empty().await);
            Ok(())
        })?;
    }

    // Hit/miss statistics reflect the reads that actually happened.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache: Cache<String> = Cache::new();
            let mut expected_hits: u64 = 0;
            let mut expected_misses: u64 = 0;

            for op in ops {
                match op {
                    CacheOp::Set { key, value } => cache.set(key, value, Ttl::Never).await,
                    CacheOp::Get { key } => match cache.get(&key).await {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    },
                    CacheOp::Remove { key } => {
                        let _ = cache.remove(&key).await;
                    }
                    CacheOp::RemoveByPrefix { prefix } => {
                        let _ = cache.remove_by_prefix(&prefix).await;
                    }
                }
            }

            let stats = cache.stats().await;
            prop_assert_eq!(stats.hits, expected_hits, "hits mismatch");
            prop_assert_eq!(stats.misses, expected_misses, "misses mismatch");
            prop_assert_eq!(stats.entries, cache.len().await, "entry count mismatch");
            Ok(())
        })?;
    }
}
