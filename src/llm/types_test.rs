use super::*;
use crate::error::ErrorCode;

// =============================================================================
// LlmError
// =============================================================================

#[test]
fn error_codes_are_stable() {
    assert_eq!(LlmError::ConfigParse("bad".into()).error_code(), "E_CONFIG_PARSE");
    assert_eq!(LlmError::MissingApiKey { var: "KEY".into() }.error_code(), "E_MISSING_API_KEY");
    assert_eq!(LlmError::ApiRequest("timeout".into()).error_code(), "E_API_REQUEST");
    assert_eq!(LlmError::ApiResponse { status: 500, body: "oops".into() }.error_code(), "E_API_RESPONSE");
    assert_eq!(LlmError::ApiParse("json".into()).error_code(), "E_API_PARSE");
    assert_eq!(LlmError::HttpClientBuild("tls".into()).error_code(), "E_HTTP_CLIENT_BUILD");
}

#[test]
fn transport_failures_and_throttling_are_retryable() {
    assert!(LlmError::ApiRequest("conn refused".into()).retryable());
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn client_errors_are_not_retryable() {
    assert!(!LlmError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!LlmError::ApiResponse { status: 401, body: String::new() }.retryable());
    assert!(!LlmError::ApiParse("eof".into()).retryable());
    assert!(!LlmError::MissingApiKey { var: "KEY".into() }.retryable());
}

// =============================================================================
// Content
// =============================================================================

#[test]
fn unknown_block_type_deserializes_to_unknown() {
    let block: ContentBlock = serde_json::from_str(r#"{"type":"redacted_thinking","data":"x"}"#).unwrap();
    assert_eq!(block, ContentBlock::Unknown);
}

#[test]
fn content_accepts_string_or_blocks() {
    let text: Content = serde_json::from_str(r#""hello""#).unwrap();
    assert!(matches!(text, Content::Text(ref t) if t == "hello"));
    let blocks: Content = serde_json::from_str(r#"[{"type":"text","text":"hi"}]"#).unwrap();
    assert!(matches!(blocks, Content::Blocks(ref b) if b.len() == 1));
}

#[test]
fn user_message_serializes_as_plain_text() {
    let json = serde_json::to_value(Message::user("draw a cat")).unwrap();
    assert_eq!(json, serde_json::json!({"role": "user", "content": "draw a cat"}));
}

#[test]
fn response_text_skips_thinking() {
    let resp = ChatResponse {
        content: vec![
            ContentBlock::Thinking { thinking: "hmm".into() },
            ContentBlock::Text { text: "[".into() },
            ContentBlock::Unknown,
            ContentBlock::Text { text: "]".into() },
        ],
        model: "mock".into(),
        stop_reason: "end_turn".into(),
        input_tokens: 0,
        output_tokens: 0,
    };
    assert_eq!(resp.text(), "[]");
}

#[test]
fn message_text_joins_blocks() {
    let msg = Message {
        role: "assistant".into(),
        content: Content::Blocks(vec![ContentBlock::Text { text: "a".into() }, ContentBlock::Text { text: "b".into() }]),
    };
    assert_eq!(msg.text(), "ab");
}
