use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::domain::BotSettings;

#[derive(Debug, Deserialize)]
pub struct CreateSettingsRequest {
    pub name: String,
    pub greeting: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub id: Uuid,
    pub name: String,
    pub greeting: String,
    #[serde(default)]
    pub is_active: bool,
}

pub async fn list_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BotSettings>>, StatusCode> {
    state
        .admin_store
        .list_settings()
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to list settings");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub async fn fetch_active(
    State(state): State<AppState>,
) -> Result<Json<BotSettings>, StatusCode> {
    match state.admin_store.active_settings().await {
        Ok(Some(settings)) => Ok(Json(settings)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch active settings");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn create_settings(
    State(state): State<AppState>,
    Json(request): Json<CreateSettingsRequest>,
) -> Result<Json<BotSettings>, StatusCode> {
    let mut settings = BotSettings::new(request.name, request.greeting);
    settings.is_active = request.is_active;

    state
        .admin_store
        .insert_settings(&settings)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to create settings");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<BotSettings>, StatusCode> {
    let existing = state
        .admin_store
        .get_settings(request.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to load settings for update");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let settings = BotSettings {
        id: request.id,
        name: request.name,
        greeting: request.greeting,
        is_active: request.is_active,
        date_created: existing.map(|s| s.date_created).unwrap_or_else(Utc::now),
        last_updated: Utc::now(),
    };

    state
        .admin_store
        .upsert_settings(&settings)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to update settings");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(settings))
}
