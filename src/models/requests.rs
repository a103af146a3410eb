//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};

/// TTL requested for a SET operation: either raw seconds or a configured
/// tier name (`"short"`, `"medium"`, `"long"`, `"reference"`, `"never"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TtlSpec {
    /// TTL in seconds
    Seconds(u64),
    /// Named tier resolved against the configured durations
    Tier(String),
}

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key; `<domain>:<selector>` namespacing enables prefix sweeps
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL (seconds or tier name; defaults to the medium tier)
    #[serde(default)]
    pub ttl: Option<TtlSpec>,
}

impl SetRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}
