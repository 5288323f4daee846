use axum::{extract::State, Json};

use crate::database::models::CategoryStats;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /order-stats - quantity and revenue per menu category
pub async fn order_stats(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryStats>>> {
    Ok(Json(state.store.order_stats().await?))
}
