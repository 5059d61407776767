use async_trait::async_trait;
use parking_lot::Mutex;
use parley_rs_core::{GatewayError, GatewayOutput, Message, ModelGateway};
use std::sync::Arc;

/// Call observed by a `RecordingGateway`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
}

/// Gateway returning the same output for every call.
#[derive(Debug, Clone)]
pub struct FixedGateway {
    output: GatewayOutput,
}

impl FixedGateway {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            output: GatewayOutput::text(text),
        }
    }

    pub fn with_output(output: GatewayOutput) -> Self {
        Self { output }
    }
}

#[async_trait]
impl ModelGateway for FixedGateway {
    async fn complete_conversation(
        &self,
        _messages: &[Message],
        _system_prompt: Option<&str>,
    ) -> Result<GatewayOutput, GatewayError> {
        Ok(self.output.clone())
    }
}

/// Gateway whose every call fails.
#[derive(Debug, Clone)]
pub struct FailingGateway {
    message: String,
}

impl FailingGateway {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ModelGateway for FailingGateway {
    async fn complete_conversation(
        &self,
        _messages: &[Message],
        _system_prompt: Option<&str>,
    ) -> Result<GatewayOutput, GatewayError> {
        Err(GatewayError::Invocation(self.message.clone()))
    }
}

/// Gateway that records what it was sent and answers with fixed text.
#[derive(Debug, Clone)]
pub struct RecordingGateway {
    response: String,
    pub calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl RecordingGateway {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last_call(&self) -> Option<GatewayCall> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl ModelGateway for RecordingGateway {
    async fn complete_conversation(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Result<GatewayOutput, GatewayError> {
        self.calls.lock().push(GatewayCall {
            messages: messages.to_vec(),
            system_prompt: system_prompt.map(str::to_string),
        });
        Ok(GatewayOutput::text(self.response.clone()))
    }
}
