//! Anthropic Messages API adapter.
//!
//! Generation only needs the model's text, so the reply is folded into one
//! text block at this boundary. Thinking blocks and block types added later
//! by the API are dropped here.

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use super::config::LlmTimeouts;
use super::http;
use super::types::{ChatResponse, ContentBlock, LlmError, Message};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        Ok(Self { http: http::build_client(timeouts)?, api_key })
    }

    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let request = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let raw = http::post_json(request, &MessagesRequest { model, max_tokens, system, messages }).await?;
        parse_reply(&raw)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct MessagesReply {
    content: Vec<ContentBlock>,
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl MessagesReply {
    fn into_chat_response(self) -> ChatResponse {
        let text: String = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let stop_reason = self.stop_reason.unwrap_or_else(|| "end_turn".to_owned());
        if stop_reason == "max_tokens" {
            tracing::warn!(model = %self.model, output_tokens = self.usage.output_tokens, "reply cut off at max_tokens");
        }
        ChatResponse {
            content: if text.is_empty() { Vec::new() } else { vec![ContentBlock::Text { text }] },
            model: self.model,
            stop_reason,
            input_tokens: self.usage.input_tokens,
            output_tokens: self.usage.output_tokens,
        }
    }
}

fn parse_reply(raw: &str) -> Result<ChatResponse, LlmError> {
    serde_json::from_str::<MessagesReply>(raw)
        .map(MessagesReply::into_chat_response)
        .map_err(|e| LlmError::ApiParse(e.to_string()))
}
