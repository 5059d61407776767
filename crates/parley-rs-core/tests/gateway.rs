//! LLM-backed gateway tests with stub providers.

use autoagents_llm::LLMProvider;
use autoagents_llm::chat::ChatRole;
use parley_rs_core::{
    ContentBlock, GatewayError, LlmGateway, Message, ModelGateway, extract_text,
};
use parley_rs_test_utils::{FailingLLM, FixedChatResponse, FixedLLM, RecordingChatLLM};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn text_response_becomes_leading_text_block() {
    let llm: Arc<dyn LLMProvider> = Arc::new(FixedLLM::new("hello back"));
    let gateway = LlmGateway::new(llm, "test-model", "eu-central-1");

    let output = gateway
        .complete_conversation(&[Message::user("hello")], None)
        .await
        .expect("complete");

    assert_eq!(output.content, vec![ContentBlock::Text("hello back".to_string())]);
    assert_eq!(extract_text(&output).expect("text"), "hello back");
}

#[tokio::test]
async fn system_prompt_and_transcript_reach_provider() {
    let llm = Arc::new(RecordingChatLLM::new("ok"));
    let gateway = LlmGateway::new(llm.clone(), "test-model", "eu-central-1");

    gateway
        .complete_conversation(
            &[Message::user("q"), Message::assistant("a"), Message::user("q2")],
            Some("Be brief."),
        )
        .await
        .expect("complete");

    let captured = llm.last_messages.lock().clone();
    assert_eq!(captured.len(), 4);
    assert_eq!(captured[0].role, ChatRole::System);
    assert_eq!(captured[0].content, "Be brief.");
    assert_eq!(captured[2].role, ChatRole::Assistant);
    assert_eq!(captured[3].content, "q2");
}

#[tokio::test]
async fn tool_only_response_fails_extraction() {
    let llm: Arc<dyn LLMProvider> =
        Arc::new(FixedLLM::with_response(FixedChatResponse::tool_only("search")));
    let gateway = LlmGateway::new(llm, "test-model", "eu-central-1");

    let output = gateway
        .complete_conversation(&[Message::user("hello")], None)
        .await
        .expect("complete");

    assert!(matches!(output.content.first(), Some(ContentBlock::Other(_))));
    assert!(matches!(
        extract_text(&output),
        Err(GatewayError::Extraction(_))
    ));
}

#[tokio::test]
async fn provider_error_is_invocation_failure() {
    let llm: Arc<dyn LLMProvider> = Arc::new(FailingLLM::new("quota exceeded"));
    let gateway = LlmGateway::new(llm, "test-model", "eu-central-1");

    let err = gateway
        .complete_conversation(&[Message::user("hello")], None)
        .await
        .expect_err("provider error");

    assert!(matches!(err, GatewayError::Invocation(message) if message.contains("quota exceeded")));
}
