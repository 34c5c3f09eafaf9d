use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::app::AppState;
use crate::store::{Document, NewDocument, StoreError};

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
}

pub async fn create_document(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let title = request.title.trim().to_owned();
    if title.is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }

    let document = state
        .documents
        .insert(NewDocument {
            title,
            content: request.content,
        })
        .await
        .map_err(|err| {
            error!(error = %err, "Failed to persist document");
            ApiError::internal()
        })?;

    info!(document_id = %document.id, "Stored document");
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state.documents.list().await.map_err(|err| {
        error!(error = %err, "Failed to list documents");
        ApiError::internal()
    })?;
    Ok(Json(documents))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let document = state
        .documents
        .find_by_id(id)
        .await
        .map_err(|err| {
            error!(error = %err, "Document lookup failed");
            ApiError::internal()
        })?
        .ok_or_else(|| ApiError::not_found("Document"))?;
    Ok(Json(document))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.documents.delete(id).await.map_err(|err| match err {
        StoreError::NotFound => ApiError::not_found("Document"),
        other => {
            error!(error = %other, "Failed to delete document");
            ApiError::internal()
        }
    })?;

    info!(document_id = %id, "Deleted document");
    Ok(StatusCode::NO_CONTENT)
}
