//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. The HTTP surface is
//! a thin collaborator over the cache facade; all cache semantics live in
//! [`crate::cache`].

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Cache, Ttl};
use crate::config::{Config, TtlTiers};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, ExistsResponse, GetResponse, HealthResponse, PurgeResponse, RemoveResponse,
    SetRequest, SetResponse, StatsResponse, TtlSpec,
};

/// Application state shared across all handlers.
///
/// The cache handle is internally shared; cloning the state clones cheap
/// references.
#[derive(Clone)]
pub struct AppState {
    /// The cache facade
    pub cache: Cache<String>,
    /// Configured TTL tiers for resolving named TTLs
    pub tiers: TtlTiers,
}

impl AppState {
    /// Creates a new AppState with an empty cache and the given tiers.
    pub fn new(tiers: TtlTiers) -> Self {
        Self {
            cache: Cache::new(),
            tiers,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tiers)
    }

    /// Resolves the TTL requested by a SET body.
    fn resolve_ttl(&self, spec: Option<&TtlSpec>) -> Result<Ttl> {
        match spec {
            None => Ok(self.tiers.default_ttl()),
            Some(TtlSpec::Seconds(secs)) => Ok(Ttl::after_secs(*secs)),
            Some(TtlSpec::Tier(name)) => self
                .tiers
                .resolve(name)
                .ok_or_else(|| CacheError::InvalidRequest(format!("Unknown TTL tier '{}'", name))),
        }
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair with an optional TTL (seconds or tier name).
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = state.resolve_ttl(req.ttl.as_ref())?;
    state.cache.set(req.key.clone(), req.value, ttl).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value by key; absence is a 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Removes a key. Idempotent: deleting an absent key succeeds with
/// `removed: false`.
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<RemoveResponse> {
    let removed = state.cache.remove(&key).await;
    Json(RemoveResponse::new(key, removed))
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.cache.exists(&key).await;
    Json(ExistsResponse::new(key, exists))
}

/// Handler for DELETE /prefix/:prefix
///
/// Removes every key with the given prefix, reporting the count.
pub async fn purge_prefix_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Json<PurgeResponse> {
    let removed = state.cache.remove_by_prefix(&prefix).await;
    Json(PurgeResponse::new(prefix, removed))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.clear().await;
    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::new(&stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
