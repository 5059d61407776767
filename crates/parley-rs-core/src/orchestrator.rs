//! Per-request session orchestration.
//!
//! One invocation walks `Received -> PreferencesResolved -> HistoryLoaded ->
//! Normalized -> ModelInvoked -> Persisted -> Responded`. Store failures degrade
//! the turn and are logged; gateway failures end it.

use crate::error::CoreError;
use crate::gateway::{ModelGateway, extract_text};
use crate::normalize::{is_alternating, normalize};
use crate::preferences::PreferenceResolver;
use crate::prompt::compose_system_prompt;
use crate::types::{InvocationRequest, Message, Role};
use log::{debug, info, warn};
use parley_rs_config::AgentSettings;
use parley_rs_memory::{MemoryStore, SessionKey};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

const PREVIEW_CHARS: usize = 100;

/// Stage reached by an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Received,
    PreferencesResolved,
    HistoryLoaded,
    Normalized,
    ModelInvoked,
    Persisted,
    Responded,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnStage::Received => "received",
            TurnStage::PreferencesResolved => "preferences_resolved",
            TurnStage::HistoryLoaded => "history_loaded",
            TurnStage::Normalized => "normalized",
            TurnStage::ModelInvoked => "model_invoked",
            TurnStage::Persisted => "persisted",
            TurnStage::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Event ids written for the turn; `None` where the append failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceReport {
    pub user_event_id: Option<String>,
    pub assistant_event_id: Option<String>,
}

impl PersistenceReport {
    pub fn is_complete(&self) -> bool {
        self.user_event_id.is_some() && self.assistant_event_id.is_some()
    }
}

/// Result of a completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub result: String,
    pub actor_id: String,
    pub session_id: String,
    /// True when the store held no events for the session before this turn.
    pub new_session: bool,
    pub persistence: PersistenceReport,
}

/// Drives one conversational turn against the store and the model gateway.
#[derive(Clone)]
pub struct SessionOrchestrator {
    settings: Arc<AgentSettings>,
    store: Arc<dyn MemoryStore>,
    gateway: Arc<dyn ModelGateway>,
    preferences: PreferenceResolver,
}

impl SessionOrchestrator {
    pub fn new(
        settings: AgentSettings,
        store: Arc<dyn MemoryStore>,
        gateway: Arc<dyn ModelGateway>,
    ) -> Self {
        let preferences = PreferenceResolver::new(
            store.clone(),
            settings.memory_id.clone(),
            settings.memory_strategy_id(),
            settings.history.preference_limit,
        );
        info!(
            "session orchestrator ready (memory_id={}, strategy_id={}, max_messages={})",
            settings.memory_id,
            preferences.strategy_id(),
            settings.history.max_messages
        );
        Self {
            settings: Arc::new(settings),
            store,
            gateway,
            preferences,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Run one turn: load context, call the model, persist the exchange.
    pub async fn invoke(&self, request: InvocationRequest) -> Result<InvocationOutcome, CoreError> {
        let actor_id = required(request.actor_id, "actorId")?;
        let prompt = required(request.prompt, "prompt")?;
        let session_id = match request.session_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => {
                let minted = Uuid::new_v4().to_string();
                debug!("minted session id (actor_id={actor_id}, session_id={minted})");
                minted
            }
        };
        stage(&session_id, TurnStage::Received);

        let key = SessionKey::new(&self.settings.memory_id, &actor_id, &session_id);
        let (preferences, events) = tokio::join!(
            self.preferences.resolve(&actor_id),
            self.store.list_events(key)
        );

        let preferences = preferences.unwrap_or_else(|err| {
            warn!("failed to resolve preferences (actor_id={actor_id}, err={err})");
            String::new()
        });
        stage(&session_id, TurnStage::PreferencesResolved);

        let events = events.unwrap_or_else(|err| {
            warn!("failed to load history (actor_id={actor_id}, session_id={session_id}, err={err})");
            Vec::new()
        });
        let new_session = events.is_empty();
        if new_session {
            info!("starting new session (actor_id={actor_id}, session_id={session_id})");
        } else {
            info!(
                "continuing session (actor_id={actor_id}, session_id={session_id}, events={})",
                events.len()
            );
        }
        stage(&session_id, TurnStage::HistoryLoaded);

        let history = normalize(&events, self.settings.history.max_messages);
        for (index, message) in history.iter().enumerate() {
            debug!(
                "history message (index={index}, role={}, text={})",
                message.role,
                preview(&message.text)
            );
        }
        stage(&session_id, TurnStage::Normalized);

        let system_prompt = compose_system_prompt(&self.settings.system_prompt, &preferences);
        let messages = outbound_messages(history, &prompt);
        debug!("user prompt (text={})", preview(&prompt));
        if !is_alternating(&messages) {
            return Err(CoreError::Normalization(format!(
                "outbound transcript of {} messages does not alternate",
                messages.len()
            )));
        }

        let output = self
            .gateway
            .complete_conversation(
                &messages,
                (!system_prompt.is_empty()).then_some(system_prompt.as_str()),
            )
            .await
            .inspect_err(|err| warn!("model call failed (session_id={session_id}, err={err})"))?;
        let result = extract_text(&output)
            .inspect_err(|err| warn!("model output unusable (session_id={session_id}, err={err})"))?;
        debug!("assistant response (text={})", preview(&result));
        stage(&session_id, TurnStage::ModelInvoked);

        let persistence = self.persist_turn(key, &prompt, &result).await;
        stage(&session_id, TurnStage::Persisted);

        info!(
            "turn complete (actor_id={actor_id}, session_id={session_id}, new_session={new_session}, persisted={})",
            persistence.is_complete()
        );
        stage(&session_id, TurnStage::Responded);
        Ok(InvocationOutcome {
            result,
            actor_id,
            session_id,
            new_session,
            persistence,
        })
    }

    async fn persist_turn(
        &self,
        key: SessionKey<'_>,
        prompt: &str,
        response: &str,
    ) -> PersistenceReport {
        let mut report = PersistenceReport::default();
        for (role, text) in [(Role::User, prompt), (Role::Assistant, response)] {
            let event_id = match self.store.append_event(key, role.to_store(), text).await {
                Ok(event_id) => Some(event_id),
                Err(err) => {
                    warn!(
                        "failed to persist turn (session_id={}, role={role}, err={err})",
                        key.session_id
                    );
                    None
                }
            };
            match role {
                Role::User => report.user_event_id = event_id,
                Role::Assistant => report.assistant_event_id = event_id,
            }
        }
        report
    }
}

/// Append the new prompt, replacing a trailing stored user message.
pub fn outbound_messages(mut history: Vec<Message>, prompt: &str) -> Vec<Message> {
    if history.last().is_some_and(|last| last.role == Role::User) {
        history.pop();
    }
    history.push(Message::user(prompt));
    history
}

fn required(value: Option<String>, field: &str) -> Result<String, CoreError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| CoreError::InvalidRequest(format!("{field} is required")))
}

fn stage(session_id: &str, stage: TurnStage) {
    debug!("turn stage (session_id={session_id}, stage={stage})");
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{outbound_messages, preview, required};
    use crate::error::CoreError;
    use crate::types::Message;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_user_message_is_replaced_by_prompt() {
        let history = vec![Message::user("q0"), Message::assistant("a0"), Message::user("q")];
        assert_eq!(
            outbound_messages(history, "q2"),
            vec![Message::user("q0"), Message::assistant("a0"), Message::user("q2")]
        );
    }

    #[test]
    fn empty_history_sends_only_prompt() {
        assert_eq!(outbound_messages(Vec::new(), "hello"), vec![Message::user("hello")]);
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        assert!(matches!(
            required(Some("  ".to_string()), "actorId"),
            Err(CoreError::InvalidRequest(message)) if message == "actorId is required"
        ));
        assert!(required(None, "prompt").is_err());
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), 103);
        assert!(shown.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }
}
