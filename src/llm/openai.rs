//! OpenAI-compatible `/chat/completions` client.
//!
//! Works against any server speaking the chat completions dialect; the base URL
//! comes from `LLM_OPENAI_BASE_URL`.

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::http;
use super::types::{ChatResponse, ContentBlock, LlmError, Message};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = http::build_client(timeouts)?;
        Ok(Self { http, api_key, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let msgs = build_messages(system, messages);
        let body = CcRequest { model, max_tokens, messages: &msgs };
        let request = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);
        let text = http::post_json(request, &body).await?;
        parse_chat_completions_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage],
}

#[derive(Debug, Serialize)]
struct CcMessage {
    role: String,
    content: String,
}

/// The system prompt travels as a leading `system` message.
fn build_messages(system: &str, messages: &[Message]) -> Vec<CcMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system.trim().is_empty() {
        out.push(CcMessage { role: "system".to_string(), content: system.to_string() });
    }
    for message in messages {
        let text = message.text();
        if !text.is_empty() {
            out.push(CcMessage { role: message.role.clone(), content: text });
        }
    }
    out
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    let usage = |key: &str| {
        root.get("usage")
            .and_then(|u| u.get(key))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    };

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let finish_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .unwrap_or("stop");

    let mut content = Vec::new();
    if let Some(text) = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        if !text.is_empty() {
            content.push(ContentBlock::Text { text: text.to_string() });
        }
    }

    let stop_reason = if finish_reason == "length" { "max_tokens" } else { "end_turn" };

    Ok(ChatResponse {
        content,
        model,
        stop_reason: stop_reason.to_string(),
        input_tokens: usage("prompt_tokens"),
        output_tokens: usage("completion_tokens"),
    })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
