// handlers/public/carts.rs - /carts handlers
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::{CartItem, DeleteResult, Document, InsertResult};
use crate::error::ApiResult;
use crate::handlers::parse_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub email: Option<String>,
}

/// GET /carts?email= - cart lines, scoped to one owner when `email` is given
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> ApiResult<Json<Vec<Document<CartItem>>>> {
    let owner = query.email.as_deref().filter(|e| !e.is_empty());
    Ok(Json(state.store.list_carts(owner).await?))
}

/// POST /carts
pub async fn add(
    State(state): State<AppState>,
    Json(item): Json<CartItem>,
) -> ApiResult<Json<InsertResult>> {
    Ok(Json(state.store.insert_cart_item(item).await?))
}

/// DELETE /carts/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResult>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.delete_cart_item(id).await?))
}
