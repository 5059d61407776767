//! Model inference gateway seam and its LLM-provider implementation.

use crate::types::{Message, Role};
use async_trait::async_trait;
use autoagents_llm::LLMProvider;
use autoagents_llm::chat::{ChatMessage, ChatRole, MessageType};
use log::{debug, info};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Failures reported by a model gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The completion call itself failed.
    #[error("model invocation failed: {0}")]
    Invocation(String),
    /// The completion returned but carried no usable text.
    #[error("response extraction failed: {0}")]
    Extraction(String),
}

/// One block of structured model output.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    /// Tool use, images, or anything else that is not plain text.
    Other(Value),
}

/// Structured completion returned by a gateway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayOutput {
    pub content: Vec<ContentBlock>,
}

impl GatewayOutput {
    /// Output holding a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
        }
    }
}

/// Completion service consuming an alternating transcript.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete_conversation(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Result<GatewayOutput, GatewayError>;
}

/// Return the text of the first content block, which must be text.
pub fn extract_text(output: &GatewayOutput) -> Result<String, GatewayError> {
    match output.content.first() {
        Some(ContentBlock::Text(text)) => Ok(text.clone()),
        Some(ContentBlock::Other(_)) => Err(GatewayError::Extraction(
            "first content block is not text".to_string(),
        )),
        None => Err(GatewayError::Extraction(
            "response carried no content".to_string(),
        )),
    }
}

/// Gateway backed by an `autoagents_llm` chat provider.
#[derive(Clone)]
pub struct LlmGateway {
    llm: Arc<dyn LLMProvider>,
    model_id: String,
    region: String,
}

impl LlmGateway {
    pub fn new(
        llm: Arc<dyn LLMProvider>,
        model_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        let gateway = Self {
            llm,
            model_id: model_id.into(),
            region: region.into(),
        };
        info!(
            "initialized model gateway (model={}, region={})",
            gateway.model_id, gateway.region
        );
        gateway
    }

    fn chat_messages(messages: &[Message], system_prompt: Option<&str>) -> Vec<ChatMessage> {
        let mut chat = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = system_prompt {
            chat.push(ChatMessage {
                role: ChatRole::System,
                message_type: MessageType::Text,
                content: prompt.to_string(),
            });
        }
        chat.extend(messages.iter().map(|message| ChatMessage {
            role: match message.role {
                Role::User => ChatRole::User,
                Role::Assistant => ChatRole::Assistant,
            },
            message_type: MessageType::Text,
            content: message.text.clone(),
        }));
        chat
    }
}

#[async_trait]
impl ModelGateway for LlmGateway {
    async fn complete_conversation(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Result<GatewayOutput, GatewayError> {
        let chat = Self::chat_messages(messages, system_prompt);
        debug!(
            "invoking model (model={}, messages={}, system_prompt={})",
            self.model_id,
            messages.len(),
            system_prompt.is_some()
        );
        let response = self
            .llm
            .chat_with_tools(&chat, None, None)
            .await
            .map_err(|err| GatewayError::Invocation(err.to_string()))?;

        let mut content = Vec::new();
        if let Some(text) = response.text() {
            content.push(ContentBlock::Text(text));
        }
        for call in response.tool_calls().unwrap_or_default() {
            content.push(ContentBlock::Other(json!({
                "tool_use": call.function.name,
                "arguments": call.function.arguments,
            })));
        }
        debug!(
            "model responded (model={}, blocks={})",
            self.model_id,
            content.len()
        );
        Ok(GatewayOutput { content })
    }
}
