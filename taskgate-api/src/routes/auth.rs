/// Login endpoint

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use taskgate_shared::models::User;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,

    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,

    /// Bearer token for the `Authorization` header
    pub token: String,
}

/// `POST /api/v1/login`
///
/// Both an unknown username and a wrong password return 401 with the same
/// body.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;

    let (user, token) = state
        .auth
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse { user, token }))
}
