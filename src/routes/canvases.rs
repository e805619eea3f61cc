//! Canvas share/load routes.

#[cfg(test)]
#[path = "canvases_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::error_response;
use crate::services::document::{self, DocumentError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub content: Value,
}

/// `POST /`: validate and store a canvas.
pub async fn create(
    State(state): State<AppState>,
    Json(content): Json<Value>,
) -> Result<(StatusCode, Json<CreatedResponse>), Response> {
    let id = document::create_document(&state.pool, &content)
        .await
        .map_err(document_error_to_response)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// `GET /:id`: fetch a stored canvas.
pub async fn load(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Json<DocumentResponse>, Response> {
    let id = document::parse_document_id(&raw_id).map_err(document_error_to_response)?;
    let content = document::load_document(&state.pool, id)
        .await
        .map_err(document_error_to_response)?;
    Ok(Json(DocumentResponse { content }))
}

pub(crate) fn document_error_status(err: &DocumentError) -> StatusCode {
    match err {
        DocumentError::InvalidId(_) | DocumentError::Invalid(_) => StatusCode::BAD_REQUEST,
        DocumentError::NotFound(_) => StatusCode::NOT_FOUND,
        DocumentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Schema failures carry the full violation list; everything else uses the shared error body.
pub(crate) fn document_error_to_response(err: DocumentError) -> Response {
    let status = document_error_status(&err);
    match err {
        DocumentError::Invalid(errors) => {
            tracing::debug!(violations = errors.len(), "canvas rejected");
            (status, Json(serde_json::json!({ "errors": errors }))).into_response()
        }
        other => error_response(status, &other),
    }
}
