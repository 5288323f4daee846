use axum::{extract::State, Json};

use crate::database::models::AdminStats;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /admin-stats
pub async fn admin_stats(State(state): State<AppState>) -> ApiResult<Json<AdminStats>> {
    Ok(Json(state.store.admin_stats().await?))
}
