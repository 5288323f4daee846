use axum::{
    extract::{Path, State},
    Json,
};

use crate::database::models::{Document, MenuItem};
use crate::error::ApiResult;
use crate::handlers::parse_id;
use crate::state::AppState;

/// GET /menu
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Document<MenuItem>>>> {
    Ok(Json(state.store.list_menu().await?))
}

/// GET /menu/:id - `null` when the item does not exist
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Document<MenuItem>>>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.find_menu_item(id).await?))
}
