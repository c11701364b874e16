use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Raw transcript as sent by the UI. Kept untyped so a malformed
    /// history degrades inside the pipeline instead of failing extraction.
    pub messages: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let query = request
        .messages
        .as_array()
        .and_then(|messages| messages.last())
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .ok_or(StatusCode::BAD_REQUEST)?
        .to_string();

    let text = state
        .chatbot
        .process_message(&query, &request.messages)
        .await
        .map_err(|e| match e {
            DomainError::NotInitialized => {
                tracing::error!("chat requested before chatbot initialization");
                StatusCode::SERVICE_UNAVAILABLE
            }
            other => {
                tracing::error!(error = %other, "failed to process chat message");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    Ok(Json(ChatResponse { text }))
}
