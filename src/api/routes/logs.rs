use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::domain::{ApiLogEntry, EventLogEntry};

#[derive(Debug, Deserialize)]
pub struct ApiLogRequest {
    pub method: String,
    pub endpoint: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLogRequest {
    pub severity: String,
    pub text_payload: String,
    pub source: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<ApiLogEntry>,
}

pub async fn record_api_log(
    State(state): State<AppState>,
    Json(request): Json<ApiLogRequest>,
) -> Result<StatusCode, StatusCode> {
    let entry = ApiLogEntry {
        method: request.method,
        endpoint: request.endpoint,
        status: request.status,
        timestamp: request.timestamp,
        ip: request.ip,
    };

    state.admin_store.record_api_log(&entry).await.map_err(|e| {
        tracing::error!(error = %e, "failed to record api log");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(StatusCode::OK)
}

pub async fn record_event_log(
    State(state): State<AppState>,
    Json(request): Json<EventLogRequest>,
) -> Result<StatusCode, StatusCode> {
    let mut entry = EventLogEntry::new(request.severity, request.text_payload, request.source);
    if let Some(timestamp) = request.timestamp {
        entry.timestamp = timestamp;
    }

    state
        .admin_store
        .record_event_log(&entry)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to record event log");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(StatusCode::OK)
}

pub async fn fetch_logs(State(state): State<AppState>) -> Result<Json<LogsResponse>, StatusCode> {
    state
        .admin_store
        .fetch_api_logs()
        .await
        .map(|logs| Json(LogsResponse { logs }))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch logs");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
