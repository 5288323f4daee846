// handlers/elevated/menu.rs - menu management
use axum::{
    extract::{Path, State},
    Json,
};

use crate::database::models::{DeleteResult, InsertResult, MenuItem, MenuItemPatch, UpdateResult};
use crate::error::{ApiError, ApiResult};
use crate::handlers::parse_id;
use crate::state::AppState;

/// POST /menu
pub async fn add(
    State(state): State<AppState>,
    Json(item): Json<MenuItem>,
) -> ApiResult<Json<InsertResult>> {
    Ok(Json(state.store.insert_menu_item(item).await?))
}

/// PATCH /menu/:id - update the supplied fields only
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MenuItemPatch>,
) -> ApiResult<Json<UpdateResult>> {
    let id = parse_id(&id)?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("No menu fields to update"));
    }
    Ok(Json(state.store.update_menu_item(id, patch).await?))
}

/// DELETE /menu/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResult>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.delete_menu_item(id).await?))
}
