// handlers/public/users.rs - POST /users handler
use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{InsertResult, Role, User};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Created(InsertResult),
    #[serde(rename_all = "camelCase")]
    Exists {
        message: &'static str,
        inserted_id: Option<Uuid>,
    },
}

/// POST /users - register a user on first sign-in; existing emails are left alone
pub async fn create(
    State(state): State<AppState>,
    Json(mut user): Json<User>,
) -> ApiResult<Json<CreateUserResponse>> {
    if user.email.trim().is_empty() {
        return Err(ApiError::bad_request("User must include an email"));
    }

    // Roles only change through promotion
    user.role = Role::Customer;
    let email = user.email.clone();

    match state.store.insert_user_if_absent(user).await? {
        Some(id) => {
            tracing::info!("Registered user {}", email);
            Ok(Json(CreateUserResponse::Created(InsertResult::inserted(id))))
        }
        None => Ok(Json(CreateUserResponse::Exists {
            message: "User Already Exists",
            inserted_id: None,
        })),
    }
}
