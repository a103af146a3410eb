//! Cache Module
//!
//! In-process get-or-populate caching with tiered TTL expiration, per-key
//! single-flight population and prefix invalidation.
//!
//! The entry store physically holds values, the key registry supports prefix
//! sweeps, the flight group coalesces concurrent populations, and the facade
//! composes the three behind a narrow API.

mod entry;
mod facade;
mod flight;
mod registry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, Ttl};
pub use facade::Cache;
pub use flight::{FlightGroup, FlightOutcome, FlightTicket};
pub use registry::KeyRegistry;
pub use stats::CacheStats;
pub use store::{EntryStore, Lookup};
