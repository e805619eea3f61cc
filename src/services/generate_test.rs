use super::*;
use crate::state::test_helpers::MockLlm;

const TWO_RECTS: &str = r##"[
  {"type": "rectangle", "position": {"x": 10, "y": 20}, "width": 100, "height": 50, "fill": "#ff0000"},
  {"type": "circle", "position": {"x": 200, "y": 20}, "width": 80, "height": 80, "fill": "#00ff00"}
]"##;

// =========================================================================
// build_system_prompt
// =========================================================================

#[test]
fn system_prompt_lists_every_kind() {
    let prompt = build_system_prompt();
    for kind in ObjectKind::ALL {
        assert!(prompt.contains(&format!("- {}", kind.as_str())), "missing {}", kind.as_str());
    }
}

#[test]
fn system_prompt_lists_payload_fields() {
    let prompt = build_system_prompt();
    assert!(prompt.contains("- arrow: points, lineWidth"));
    assert!(prompt.contains("- embed: embedUrl"));
    assert!(prompt.contains("\n- rectangle\n"));
}

// =========================================================================
// extract_json_array
// =========================================================================

#[test]
fn extract_finds_array_inside_prose() {
    let text = "Sure! Here you go:\n```json\n[{\"a\": [1, 2]}]\n```\nEnjoy.";
    assert_eq!(extract_json_array(text), Some("[{\"a\": [1, 2]}]"));
}

#[test]
fn extract_none_without_brackets() {
    assert_eq!(extract_json_array("no array here"), None);
    assert_eq!(extract_json_array("] backwards ["), None);
}

// =========================================================================
// parse_generated
// =========================================================================

#[test]
fn parse_assigns_valid_ids() {
    let records = parse_generated(TWO_RECTS).unwrap();
    assert_eq!(records.len(), 2);
    for record in &records {
        let id = record["id"].as_str().unwrap();
        assert!(ObjectId::is_valid(id));
    }
    assert_ne!(records[0]["id"], records[1]["id"]);
}

#[test]
fn parse_overwrites_model_supplied_ids() {
    let text = r#"[{"id": "bad", "type": "rectangle", "position": {"x": 0, "y": 0}, "width": 1, "height": 1, "fill": "red"}]"#;
    let records = parse_generated(text).unwrap();
    assert_ne!(records[0]["id"], "bad");
}

#[test]
fn parse_skips_invalid_records() {
    let text = r#"[
      {"type": "rectangle", "position": {"x": 0, "y": 0}, "width": 10, "height": 10, "fill": "red"},
      {"type": "hexagon", "position": {"x": 0, "y": 0}, "width": 10, "height": 10, "fill": "red"},
      {"type": "arrow", "position": {"x": 0, "y": 0}, "width": 10, "height": 10, "fill": "red", "points": [{"x": 0, "y": 0}]},
      "not an object"
    ]"#;
    let records = parse_generated(text).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["type"], "rectangle");
}

#[test]
fn parse_strips_unknown_fields() {
    let text = r##"[{"type": "text", "position": {"x": 0, "y": 0}, "width": 10, "height": 10, "fill": "#000", "text": "hi", "script": "x"}]"##;
    let records = parse_generated(text).unwrap();
    assert_eq!(records[0]["text"], "hi");
    assert!(records[0].get("script").is_none());
}

#[test]
fn parse_all_invalid_is_unusable() {
    let err = parse_generated(r#"[{"type": "blob"}]"#).unwrap_err();
    assert!(matches!(err, GenerateError::Unusable(_)));
    assert_eq!(err.error_code(), "E_LLM_UNUSABLE");
    assert!(err.retryable());
}

#[test]
fn parse_empty_array_is_unusable() {
    assert!(matches!(parse_generated("[]"), Err(GenerateError::Unusable(_))));
}

#[test]
fn parse_bad_json_is_unusable() {
    assert!(matches!(parse_generated("[{oops}]"), Err(GenerateError::Unusable(_))));
    assert!(matches!(parse_generated("I cannot help with that."), Err(GenerateError::Unusable(_))));
}

// =========================================================================
// generate_objects (with MockLlm)
// =========================================================================

#[tokio::test]
async fn generate_returns_records() {
    let llm = MockLlm::replying(TWO_RECTS);
    let records = generate_objects(&llm, 1024, "  two shapes  ").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(llm.prompts.lock().unwrap().as_slice(), ["two shapes"]);
}

#[tokio::test]
async fn generate_rejects_empty_prompt_without_calling_llm() {
    let llm = MockLlm::replying(TWO_RECTS);
    let err = generate_objects(&llm, 1024, "   ").await.unwrap_err();
    assert!(matches!(err, GenerateError::EmptyPrompt));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn generate_rejects_long_prompt() {
    let llm = MockLlm::replying(TWO_RECTS);
    let prompt = "x".repeat(MAX_PROMPT_CHARS + 1);
    let err = generate_objects(&llm, 1024, &prompt).await.unwrap_err();
    assert!(matches!(err, GenerateError::PromptTooLong));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn generate_propagates_llm_error() {
    let llm = MockLlm::failing(LlmError::ApiResponse { status: 503, body: "overloaded".into() });
    let err = generate_objects(&llm, 1024, "shapes").await.unwrap_err();
    assert!(matches!(err, GenerateError::Llm(LlmError::ApiResponse { status: 503, .. })));
    assert_eq!(err.error_code(), "E_LLM_ERROR");
    assert!(err.retryable());
}

#[test]
fn prompt_errors_are_not_retryable() {
    assert!(!GenerateError::EmptyPrompt.retryable());
    assert!(!GenerateError::NotConfigured.retryable());
    assert_eq!(GenerateError::NotConfigured.error_code(), "E_LLM_NOT_CONFIGURED");
}
