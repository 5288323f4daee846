// handlers/public/tokens.rs - POST /jwt handler
use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::{Identity, TokenError};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /jwt - sign the posted identity into a one-hour bearer token
///
/// The client is expected to have authenticated the user with its identity
/// provider already; this only exchanges that identity for an API token.
pub async fn issue(
    State(state): State<AppState>,
    Json(identity): Json<Identity>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.tokens.issue(identity).map_err(|e| match e {
        TokenError::MissingEmail => ApiError::bad_request(e.to_string()),
        other => {
            tracing::error!("Failed to sign token: {}", other);
            ApiError::internal_server_error("Failed to issue token")
        }
    })?;

    Ok(Json(TokenResponse { token }))
}
