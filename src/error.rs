//! Error types for tiercache
//!
//! Provides unified error handling using thiserror.
//!
//! Absence of a key is never an error at the library level: `get` returns
//! `None` and `exists` returns `false`. `NotFound` and `InvalidRequest` exist
//! for the HTTP surface. `Factory` failures are wrapped in an `Arc` so the
//! identical error can fan out to every waiter of a single-flight population.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP surface.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The value-producing factory failed; nothing was cached
    #[error("population of key '{key}' failed: {cause}")]
    Factory {
        /// Key whose population failed
        key: String,
        /// The factory's error, shared verbatim by every waiter
        cause: Arc<anyhow::Error>,
    },

    /// The in-flight population vanished without delivering an outcome
    #[error("wait for key '{0}' was cancelled")]
    WaitCancelled(String),

    /// Key not found (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data (HTTP surface only)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Wraps a factory failure for the given key.
    pub fn factory(key: impl Into<String>, cause: anyhow::Error) -> Self {
        CacheError::Factory {
            key: key.into(),
            cause: Arc::new(cause),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Factory { .. } => StatusCode::BAD_GATEWAY,
            CacheError::WaitCancelled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
