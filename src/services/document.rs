//! Document service: validated storage of shared canvases.
//!
//! DESIGN
//! ======
//! A shared canvas is one JSON array of objects stored as an opaque `jsonb`
//! blob. Content is sanitized with `canvas::schema` before it is written, so
//! every stored document only carries known fields. Ids are UUIDv7 so rows sort
//! by creation time.

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use canvas::schema::{self, SchemaViolation};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("document not found: {0}")]
    NotFound(Uuid),
    #[error("content failed validation with {} violation(s)", .0.len())]
    Invalid(Vec<SchemaViolation>),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for DocumentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "E_INVALID_ID",
            Self::NotFound(_) => "E_DOCUMENT_NOT_FOUND",
            Self::Invalid(_) => "E_SCHEMA",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// Parse a path segment as a document id. Only time-ordered (v7) ids are issued.
///
/// # Errors
///
/// Returns [`DocumentError::InvalidId`] when `raw` is not a UUIDv7.
pub fn parse_document_id(raw: &str) -> Result<Uuid, DocumentError> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) if id.get_version_num() == 7 => Ok(id),
        _ => Err(DocumentError::InvalidId(raw.to_owned())),
    }
}

/// Validate submitted content and return the sanitized array.
///
/// # Errors
///
/// Returns [`DocumentError::Invalid`] carrying every violation found.
pub fn validate_content(content: &Value) -> Result<Value, DocumentError> {
    schema::sanitize_objects(content)
        .map(Value::Array)
        .map_err(DocumentError::Invalid)
}

/// Validate and store a canvas, returning its new id.
///
/// # Errors
///
/// Returns a validation error before touching the database, or a database error.
pub async fn create_document(pool: &PgPool, content: &Value) -> Result<Uuid, DocumentError> {
    let clean = validate_content(content)?;
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO canvas_documents (id, content) VALUES ($1, $2)")
        .bind(id)
        .bind(&clean)
        .execute(pool)
        .await?;
    tracing::info!(%id, objects = clean.as_array().map_or(0, Vec::len), "document stored");
    Ok(id)
}

/// Load the stored object array for `id`.
///
/// # Errors
///
/// Returns [`DocumentError::NotFound`] when no row matches.
pub async fn load_document(pool: &PgPool, id: Uuid) -> Result<Value, DocumentError> {
    sqlx::query_scalar::<_, Value>("SELECT content FROM canvas_documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DocumentError::NotFound(id))
}
