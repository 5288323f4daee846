use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Role gate: looks up the caller's stored role. Must be layered inside
/// `require_identity`, which supplies the `AuthUser`.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Owned copy: the request must not be borrowed across the store call
    let email = request
        .extensions()
        .get::<AuthUser>()
        .map(|auth_user| auth_user.email.clone())
        .ok_or_else(|| ApiError::unauthorized("Authentication required before role check"))?;

    let user = state.store.find_user_by_email(&email).await?;
    let is_admin = user.as_ref().is_some_and(|u| u.body.is_admin());

    if !is_admin {
        tracing::warn!(
            "Role check failed: {} is not an admin ({})",
            email,
            if user.is_some() { "insufficient role" } else { "unknown user" }
        );
        return Err(ApiError::forbidden("forbidden access"));
    }

    tracing::debug!("Role check passed for {}", email);
    Ok(next.run(request).await)
}
