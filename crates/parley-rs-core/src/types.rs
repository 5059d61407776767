//! Message and request types shared across the core.

use parley_rs_memory::StoreRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a normalized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Map a store role onto the two-role vocabulary, if it is one of them.
    pub fn from_store(role: &StoreRole) -> Option<Self> {
        match role {
            StoreRole::User => Some(Role::User),
            StoreRole::Assistant => Some(Role::Assistant),
            StoreRole::Other(_) => None,
        }
    }

    /// Store role used when persisting a turn with this speaker.
    pub fn to_store(self) -> StoreRole {
        match self {
            Role::User => StoreRole::User,
            Role::Assistant => StoreRole::Assistant,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One normalized utterance sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// Inbound invocation as decoded from the wire.
///
/// Required fields are optional here so that their absence is reported as an
/// invalid request rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl InvocationRequest {
    pub fn new(actor_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            actor_id: Some(actor_id.into()),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}
