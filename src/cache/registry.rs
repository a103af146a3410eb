//! Key Registry Module
//!
//! Tracks the set of keys currently believed live in the entry store so that
//! prefix sweeps and full clears only touch matching keys.
//!
//! The registry is mutated in lockstep with store writes and removals (under
//! the same facade lock) and must stay a superset of the store's live keys; a
//! stale extra key costs one wasted removal, a missing key would orphan an
//! entry during a prefix sweep.

use std::collections::HashSet;

// == Key Registry ==
/// Set of tracked cache keys.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    /// Keys believed present in the store
    keys: HashSet<String>,
}

impl KeyRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    // == Track ==
    /// Records a key as live. Idempotent.
    pub fn track(&mut self, key: String) {
        self.keys.insert(key);
    }

    // == Untrack ==
    /// Forgets a key. Idempotent.
    pub fn untrack(&mut self, key: &str) {
        self.keys.remove(key);
    }

    // == Contains ==
    /// Checks whether a key is tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    // == Keys With Prefix ==
    /// Iterates every tracked key whose byte-prefix matches.
    ///
    /// Iteration order is unspecified; callers must not depend on it. An empty
    /// prefix matches every key.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.keys
            .iter()
            .filter(move |key| key.starts_with(prefix))
            .map(String::as_str)
    }

    // == Clear ==
    /// Empties the registry.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
