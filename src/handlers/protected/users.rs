use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminCheck {
    pub admin: bool,
}

/// GET /users/admin/:email - whether the caller holds the admin role
pub async fn check_admin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<Json<AdminCheck>> {
    auth.ensure_owner(&email)?;

    let admin = state
        .store
        .find_user_by_email(&email)
        .await?
        .is_some_and(|user| user.body.is_admin());

    Ok(Json(AdminCheck { admin }))
}
