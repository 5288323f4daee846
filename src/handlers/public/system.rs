use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Bistro Boss API",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Bistro Boss is eating"
    }))
}

/// GET /health - liveness including the store
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}
