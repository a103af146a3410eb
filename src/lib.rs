//! tiercache - An in-process get-or-populate cache
//!
//! Provides tiered TTL expiration, per-key single-flight population and
//! prefix-based bulk invalidation, with a thin HTTP surface for operating the
//! cache as a standalone server.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheStats, Ttl};
pub use config::{Config, TtlTiers};
pub use error::{CacheError, Result};
pub use tasks::spawn_sweeper;
