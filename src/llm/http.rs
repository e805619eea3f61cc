//! HTTP plumbing shared by the provider clients.

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use serde::Serialize;

use super::config::LlmTimeouts;
use super::types::LlmError;

/// Bytes of a failed response body kept in [`LlmError::ApiResponse`].
const ERROR_BODY_LIMIT: usize = 512;

/// Build a client with the configured request and connect timeouts.
///
/// # Errors
///
/// Returns [`LlmError::HttpClientBuild`] if the TLS backend fails to initialize.
pub fn build_client(timeouts: LlmTimeouts) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .map_err(|e| LlmError::HttpClientBuild(e.to_string()))
}

/// Send `body` as JSON and return the raw body of a 2xx reply.
///
/// # Errors
///
/// Transport failures become [`LlmError::ApiRequest`]; non-success statuses
/// become [`LlmError::ApiResponse`] with the body clipped.
pub async fn post_json(request: reqwest::RequestBuilder, body: &impl Serialize) -> Result<String, LlmError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "provider rejected request");
        return Err(LlmError::ApiResponse { status: status.as_u16(), body: clip_body(&text) });
    }
    Ok(text)
}

/// First [`ERROR_BODY_LIMIT`] bytes of `body`, cut on a char boundary.
fn clip_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_owned();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
