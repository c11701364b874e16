use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;

pub const CLIENT_TOKEN_HEADER: &str = "ragbot-client-token";

/// Gates the admin surface behind a shared client token. When no token is
/// configured the gate is open.
pub async fn client_token_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = &state.config.admin_client_token else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(CLIENT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided == Some(expected.as_str()) {
        Ok(next.run(request).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
