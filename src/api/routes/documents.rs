use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::domain::Document;

#[derive(Debug, Deserialize)]
pub struct DocumentPayload {
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct AddDocumentsRequest {
    pub documents: Vec<DocumentPayload>,
    /// Ids to upsert under; generated when omitted.
    pub ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AddDocumentsResponse {
    pub added: usize,
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteDocumentsRequest {
    pub ids: Vec<String>,
}

pub async fn add_documents(
    State(state): State<AppState>,
    Json(request): Json<AddDocumentsRequest>,
) -> Result<Json<AddDocumentsResponse>, StatusCode> {
    let Some(store) = &state.documents else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let documents: Vec<Document> = request
        .documents
        .into_iter()
        .map(|payload| Document {
            content: payload.content,
            metadata: payload.metadata,
        })
        .collect();

    let ids = request
        .ids
        .unwrap_or_else(|| documents.iter().map(|_| Uuid::new_v4().to_string()).collect());
    if ids.len() != documents.len() {
        return Err(StatusCode::BAD_REQUEST);
    }

    store.add_documents(&documents, &ids).await.map_err(|e| {
        tracing::error!(error = %e, "failed to add documents");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(AddDocumentsResponse {
        added: documents.len(),
        ids,
    }))
}

pub async fn delete_documents(
    State(state): State<AppState>,
    Json(request): Json<DeleteDocumentsRequest>,
) -> Result<StatusCode, StatusCode> {
    let Some(store) = &state.documents else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    store.delete_documents(&request.ids).await.map_err(|e| {
        tracing::error!(error = %e, "failed to delete documents");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(StatusCode::NO_CONTENT)
}
