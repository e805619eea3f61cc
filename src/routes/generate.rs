//! AI generation route.

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::error::error_response;
use crate::services::generate::{self, GenerateError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
}

/// `POST /generate`: turn a prompt into canvas records.
pub async fn generate(State(state): State<AppState>, Json(body): Json<GenerateBody>) -> Result<Json<Vec<Value>>, Response> {
    let Some(llm) = state.llm.as_deref() else {
        return Err(error_response(generate_error_status(&GenerateError::NotConfigured), &GenerateError::NotConfigured));
    };
    generate::generate_objects(llm, state.config.generate_max_tokens, &body.prompt)
        .await
        .map(Json)
        .map_err(|err| error_response(generate_error_status(&err), &err))
}

pub(crate) fn generate_error_status(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        GenerateError::EmptyPrompt | GenerateError::PromptTooLong => StatusCode::BAD_REQUEST,
        GenerateError::Llm(_) | GenerateError::Unusable(_) => StatusCode::BAD_GATEWAY,
    }
}
