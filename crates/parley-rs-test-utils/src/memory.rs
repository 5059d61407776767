use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use parley_rs_memory::{
    Content, Event, MemoryError, MemoryStore, Payload, PreferenceRecord, SessionKey, StoreRole,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Operations a `StubStore` should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreFailures {
    pub list_events: bool,
    pub list_preferences: bool,
    pub append_user: bool,
    pub append_assistant: bool,
}

/// Query observed by `list_preference_records`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceQuery {
    pub memory_id: String,
    pub namespace: String,
    pub strategy_id: String,
    pub limit: usize,
}

/// In-memory store with seeded history and injectable failures.
#[derive(Clone, Default)]
pub struct StubStore {
    events: Arc<Mutex<HashMap<(String, String), Vec<Event>>>>,
    preferences: Vec<PreferenceRecord>,
    failures: StoreFailures,
    appended: Arc<Mutex<Vec<(StoreRole, String)>>>,
    preference_queries: Arc<Mutex<Vec<PreferenceQuery>>>,
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session with chronological `(role, text)` turns.
    pub fn with_history(self, actor_id: &str, session_id: &str, turns: &[(StoreRole, &str)]) -> Self {
        let events = turns
            .iter()
            .map(|(role, text)| Event {
                event_id: Uuid::new_v4().to_string(),
                memory_id: "memory_stub".to_string(),
                actor_id: actor_id.to_string(),
                session_id: session_id.to_string(),
                timestamp: Utc::now(),
                payload: vec![Payload::text(role.clone(), *text)],
            })
            .collect();
        self.events
            .lock()
            .insert((actor_id.to_string(), session_id.to_string()), events);
        self
    }

    /// Seed preference records returned for every query.
    pub fn with_preferences(mut self, contents: Vec<Content>) -> Self {
        self.preferences = contents
            .into_iter()
            .map(|content| PreferenceRecord {
                record_id: Uuid::new_v4().to_string(),
                namespace: String::new(),
                strategy_id: String::new(),
                content,
                created_at: Utc::now(),
            })
            .collect();
        self
    }

    pub fn with_failures(mut self, failures: StoreFailures) -> Self {
        self.failures = failures;
        self
    }

    /// Successful appends in call order.
    pub fn appended(&self) -> Vec<(StoreRole, String)> {
        self.appended.lock().clone()
    }

    pub fn preference_queries(&self) -> Vec<PreferenceQuery> {
        self.preference_queries.lock().clone()
    }
}

#[async_trait]
impl MemoryStore for StubStore {
    async fn append_event(
        &self,
        key: SessionKey<'_>,
        role: StoreRole,
        text: &str,
    ) -> Result<String, MemoryError> {
        let fail = match role {
            StoreRole::User => self.failures.append_user,
            StoreRole::Assistant => self.failures.append_assistant,
            StoreRole::Other(ref value) => return Err(MemoryError::UnsupportedRole(value.clone())),
        };
        if fail {
            return Err(MemoryError::Unavailable("append disabled".to_string()));
        }
        let event = Event {
            event_id: Uuid::new_v4().to_string(),
            memory_id: key.memory_id.to_string(),
            actor_id: key.actor_id.to_string(),
            session_id: key.session_id.to_string(),
            timestamp: Utc::now(),
            payload: vec![Payload::text(role.clone(), text)],
        };
        let event_id = event.event_id.clone();
        self.events
            .lock()
            .entry((key.actor_id.to_string(), key.session_id.to_string()))
            .or_default()
            .push(event);
        self.appended.lock().push((role, text.to_string()));
        Ok(event_id)
    }

    async fn list_events(&self, key: SessionKey<'_>) -> Result<Vec<Event>, MemoryError> {
        if self.failures.list_events {
            return Err(MemoryError::Unavailable("history disabled".to_string()));
        }
        let mut events = self
            .events
            .lock()
            .get(&(key.actor_id.to_string(), key.session_id.to_string()))
            .cloned()
            .unwrap_or_default();
        events.reverse();
        Ok(events)
    }

    async fn list_preference_records(
        &self,
        memory_id: &str,
        namespace: &str,
        strategy_id: &str,
        limit: usize,
    ) -> Result<Vec<PreferenceRecord>, MemoryError> {
        self.preference_queries.lock().push(PreferenceQuery {
            memory_id: memory_id.to_string(),
            namespace: namespace.to_string(),
            strategy_id: strategy_id.to_string(),
            limit,
        });
        if self.failures.list_preferences {
            return Err(MemoryError::Unavailable("preferences disabled".to_string()));
        }
        Ok(self.preferences.iter().take(limit).cloned().collect())
    }
}
