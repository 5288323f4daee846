// handlers/mod.rs - handlers grouped by security tier
//
// public    - no authentication
// protected - verified bearer token (identity)
// elevated  - verified bearer token + stored admin role
//
// Tier membership is decided in app.rs; handlers in a tier may assume the
// gates of that tier have already run.
pub mod elevated;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a document id from a path segment
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid id: {}", raw)))
}
