use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde_json::{Map, Value};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity extracted from a verified bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
    pub extra: Map<String, Value>,
    pub expires_at: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.identity.email,
            extra: claims.identity.extra,
            expires_at: claims.exp,
        }
    }
}

impl AuthUser {
    /// Self-scoped routes may only be used on the caller's own email.
    pub fn ensure_owner(&self, email: &str) -> Result<(), ApiError> {
        if self.email != email {
            tracing::warn!("{} attempted to access resources of {}", self.email, email);
            return Err(ApiError::forbidden("forbidden access"));
        }
        Ok(())
    }
}

/// Identity gate: verifies the bearer token and stores `AuthUser` in the request
pub async fn require_identity(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|msg| {
        tracing::debug!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Token verification failed for {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}
