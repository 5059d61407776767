//! Event and preference record model used by stores.
//!
//! Payload and content are tagged variants: one conversational/text shape the
//! agent understands and an opaque `Other` carrying whatever else a store
//! returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Addresses one conversation thread in a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionKey<'a> {
    pub memory_id: &'a str,
    pub actor_id: &'a str,
    pub session_id: &'a str,
}

impl<'a> SessionKey<'a> {
    pub fn new(memory_id: &'a str, actor_id: &'a str, session_id: &'a str) -> Self {
        Self {
            memory_id,
            actor_id,
            session_id,
        }
    }
}

/// Role vocabulary used by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoreRole {
    User,
    Assistant,
    /// Any role the agent does not converse in (tool, system, ...).
    Other(String),
}

impl StoreRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &str {
        match self {
            StoreRole::User => "user",
            StoreRole::Assistant => "assistant",
            StoreRole::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for StoreRole {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "user" => StoreRole::User,
            "assistant" => StoreRole::Assistant,
            _ => StoreRole::Other(value),
        }
    }
}

impl From<StoreRole> for String {
    fn from(role: StoreRole) -> Self {
        role.as_str().to_string()
    }
}

/// Record or message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    Text(String),
    /// Non-text content (structured, binary references, ...).
    Other(serde_json::Value),
}

/// Conversational payload: one utterance with its role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversational {
    pub role: StoreRole,
    pub content: Content,
}

/// One payload entry attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Conversational(Conversational),
    /// Non-conversational payload (blobs, state snapshots, ...).
    Other(serde_json::Value),
}

impl Payload {
    /// Build a conversational text payload.
    pub fn text(role: StoreRole, text: impl Into<String>) -> Self {
        Payload::Conversational(Conversational {
            role,
            content: Content::Text(text.into()),
        })
    }
}

/// Persisted event in a session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub memory_id: String,
    pub actor_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Vec<Payload>,
}

/// Long-term record extracted by a memory strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub record_id: String,
    pub namespace: String,
    pub strategy_id: String,
    pub content: Content,
    pub created_at: DateTime<Utc>,
}
