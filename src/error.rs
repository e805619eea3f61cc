//! Stable error codes shared by services and the JSON error body returned
//! from routes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ErrorBody {
    pub fn from_error(err: &impl ErrorCode) -> Self {
        Self { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}

/// `{"error": {code, message, retryable}}` with the given status.
pub fn error_response(status: StatusCode, err: &impl ErrorCode) -> Response {
    if status.is_server_error() {
        tracing::error!(code = err.error_code(), error = %err, "request failed");
    } else {
        tracing::debug!(code = err.error_code(), error = %err, "request rejected");
    }
    (status, Json(serde_json::json!({ "error": ErrorBody::from_error(err) }))).into_response()
}
