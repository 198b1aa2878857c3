/// User registration endpoint

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Serialize;
use taskgate_shared::models::User;
use taskgate_shared::services::RegisterUser;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// `POST /api/v1/users`
///
/// ```json
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "...",
///   "role": "user",
///   "company_ids": [1, 2]
/// }
/// ```
///
/// Returns 201 with the created user. The password hash is never included.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(request) = payload?;

    let user = state.users.register(request).await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}
