//! Generate service: turns a prompt into schema-conformant canvas records.
//!
//! DESIGN
//! ======
//! The model is asked for a bare JSON array of objects. Whatever text comes
//! back is scanned for the outermost array, every record gets a placeholder
//! id, and each one is sanitized on its own: bad records are dropped with a
//! warning instead of failing the whole batch. The client re-keys every record
//! on insert, so the placeholder ids only need to pass validation.

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;

use canvas::doc::{ObjectId, ObjectKind};
use canvas::schema;
use serde_json::Value;

use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};

/// Longest prompt accepted, in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("LLM not configured")]
    NotConfigured,
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("prompt exceeds {MAX_PROMPT_CHARS} characters")]
    PromptTooLong,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("LLM returned no usable objects: {0}")]
    Unusable(String),
}

impl ErrorCode for GenerateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::EmptyPrompt => "E_EMPTY_PROMPT",
            Self::PromptTooLong => "E_PROMPT_TOO_LONG",
            Self::Llm(_) => "E_LLM_ERROR",
            Self::Unusable(_) => "E_LLM_UNUSABLE",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            Self::Unusable(_) => true,
            _ => false,
        }
    }
}

/// System prompt describing the object format, built from the schema's field lists.
#[must_use]
pub fn build_system_prompt() -> String {
    let mut out = String::from(
        "You place objects on an infinite 2D drawing canvas. Reply with only a JSON array of objects, \
         no prose and no code fences. Coordinates are world units with y growing downward; keep \
         everything within roughly 0..1200 x 0..800.\n\nEvery object has: type, position {x, y} \
         (top-left), width, height, fill (CSS color). Optional: rotation (degrees), locked.\n\nTypes \
         and their extra fields:\n",
    );
    let envelope_len = schema::allowed_fields(ObjectKind::Rectangle).len();
    for kind in ObjectKind::ALL {
        let fields = schema::allowed_fields(kind);
        let extra = fields.get(envelope_len..).unwrap_or(&[]);
        out.push_str("- ");
        out.push_str(kind.as_str());
        if !extra.is_empty() {
            out.push_str(": ");
            out.push_str(&extra.join(", "));
        }
        out.push('\n');
    }
    out.push_str(
        "\nLines and arrows use points [{x, y}, ...]; arrows have exactly two. Text weight is a multiple \
         of 100 from 100 to 900. Do not include ids.",
    );
    out
}

/// The outermost `[...]` slice of `text`, if any.
#[must_use]
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse model output into sanitized records, skipping any that fail validation.
///
/// # Errors
///
/// Returns [`GenerateError::Unusable`] when no array is found or no record survives.
pub fn parse_generated(text: &str) -> Result<Vec<Value>, GenerateError> {
    let raw = extract_json_array(text).ok_or_else(|| GenerateError::Unusable("no JSON array in reply".into()))?;
    let items: Vec<Value> =
        serde_json::from_str(raw).map_err(|e| GenerateError::Unusable(format!("reply is not valid JSON: {e}")))?;

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (index, mut item) in items.into_iter().enumerate() {
        if let Some(map) = item.as_object_mut() {
            map.insert("id".into(), Value::String(ObjectId::generate().as_str().to_owned()));
        }
        match schema::sanitize_object(index, &item) {
            Ok(clean) => records.push(clean),
            Err(violations) => {
                let first = violations.first().map(ToString::to_string).unwrap_or_default();
                tracing::warn!(index, count = violations.len(), %first, "dropping generated record");
            }
        }
    }

    if records.is_empty() {
        return Err(GenerateError::Unusable(format!("0 of {total} records passed validation")));
    }
    tracing::debug!(kept = records.len(), total, "generated records parsed");
    Ok(records)
}

/// Ask the model for objects matching `prompt`.
///
/// # Errors
///
/// Returns a prompt error before calling the model, an [`LlmError`] from the
/// provider, or [`GenerateError::Unusable`] when the reply holds nothing valid.
pub async fn generate_objects(llm: &dyn LlmChat, max_tokens: u32, prompt: &str) -> Result<Vec<Value>, GenerateError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerateError::EmptyPrompt);
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(GenerateError::PromptTooLong);
    }

    let system = build_system_prompt();
    let response = llm.chat(max_tokens, &system, &[Message::user(prompt)]).await?;
    tracing::info!(
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        stop_reason = %response.stop_reason,
        "generation finished"
    );
    parse_generated(&response.text())
}
