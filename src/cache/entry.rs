//! Cache Entry Module
//!
//! Defines individual cache entries and the TTL sentinel type.

use std::time::Duration;

use tokio::time::Instant;

// == Time To Live ==
/// Expiration policy for a single entry.
///
/// `Never` is the reserved sentinel for entries that stay live until they are
/// explicitly removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The entry never expires.
    Never,
    /// The entry expires once this duration has elapsed after insertion.
    After(Duration),
}

impl Ttl {
    /// Convenience constructor for a TTL expressed in whole seconds.
    pub fn after_secs(secs: u64) -> Self {
        Ttl::After(Duration::from_secs(secs))
    }

    /// Returns true for the never-expire sentinel.
    pub fn is_never(&self) -> bool {
        matches!(self, Ttl::Never)
    }
}

// == Cache Entry ==
/// A single cached value with its expiry metadata.
///
/// Entries are owned exclusively by the store; callers only ever receive
/// clones of the value.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion time
    pub inserted_at: Instant,
    /// Expiration time, None = never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry, stamping insertion and expiry times.
    ///
    /// A duration too large to represent as an instant is treated as never
    /// expiring.
    pub fn new(value: V, ttl: Ttl) -> Self {
        let now = Instant::now();
        let expires_at = match ttl {
            Ttl::Never => None,
            Ttl::After(duration) => now.checked_add(duration),
        };

        Self {
            value,
            inserted_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to its expiration time, so a zero TTL is expired
    /// the moment it is observed.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }
}
