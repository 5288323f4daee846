use axum::{extract::State, Json};

use crate::database::models::{Document, Review};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /reviews
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Document<Review>>>> {
    Ok(Json(state.store.list_reviews().await?))
}
