//! Request and response DTOs for the cache server API.
//!
//! The cache core treats keys and values as opaque; the size limits below are
//! enforced only at this HTTP boundary.

pub mod requests;
pub mod responses;

pub use requests::{SetRequest, TtlSpec};
pub use responses::{
    ClearResponse, ExistsResponse, GetResponse, HealthResponse, PurgeResponse, RemoveResponse,
    SetResponse, StatsResponse,
};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
