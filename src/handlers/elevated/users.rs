// handlers/elevated/users.rs - user administration
use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::database::models::{DeleteResult, Document, UpdateResult, User};
use crate::error::ApiResult;
use crate::handlers::parse_id;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Document<User>>>> {
    Ok(Json(state.store.list_users().await?))
}

/// PATCH /users/admin/:id - grant the admin role
pub async fn promote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<UpdateResult>> {
    let id = parse_id(&id)?;
    let result = state.store.promote_user(id).await?;

    if result.modified_count > 0 {
        tracing::info!("{} promoted user {} to admin", auth.email, id);
    }
    Ok(Json(result))
}

/// DELETE /users/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResult>> {
    let id = parse_id(&id)?;
    let result = state.store.delete_user(id).await?;

    if result.deleted_count > 0 {
        tracing::info!("{} deleted user {}", auth.email, id);
    }
    Ok(Json(result))
}
