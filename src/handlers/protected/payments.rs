use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::database::models::{Document, Payment};
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /payments/:email - the caller's own payment history
pub async fn list_own(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<Json<Vec<Document<Payment>>>> {
    auth.ensure_owner(&email)?;
    Ok(Json(state.store.list_payments_by_email(&email).await?))
}
