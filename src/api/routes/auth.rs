use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::domain::AdminUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<AdminUser>,
}

/// Plaintext credential match against the stored admin records. Not a
/// session protocol; the dashboard treats a 200 as logged in.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let matched = state
        .admin_store
        .verify_login(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "login lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if matched {
        Ok(Json(LoginResponse {
            status: "200".to_string(),
        }))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, StatusCode> {
    state
        .admin_store
        .list_users()
        .await
        .map(|users| Json(UsersResponse { users }))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch users");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
