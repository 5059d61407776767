//! History normalization into a model-admissible transcript.
//!
//! Store events arrive newest first. The output is chronological, bounded to
//! `max_messages`, opens with a user message, and never repeats a role twice in
//! a row.

use crate::types::{Message, Role};
use parley_rs_memory::{Content, Event, Payload};

/// Convert newest-first store events into an alternating message sequence.
pub fn normalize(raw_events: &[Event], max_messages: usize) -> Vec<Message> {
    let mut messages: Vec<Message> = raw_events
        .iter()
        .rev()
        .flat_map(|event| event.payload.iter())
        .filter_map(message_from_payload)
        .collect();

    if messages.len() > max_messages {
        messages.drain(..messages.len() - max_messages);
    }

    let first_user = messages
        .iter()
        .position(|message| message.role == Role::User)
        .unwrap_or(messages.len());
    messages.drain(..first_user);

    let mut alternating: Vec<Message> = Vec::with_capacity(messages.len());
    for message in messages {
        if alternating
            .last()
            .is_some_and(|last| last.role == message.role)
        {
            continue;
        }
        alternating.push(message);
    }
    alternating
}

/// True when the sequence is empty or starts with a user message and alternates.
pub fn is_alternating(messages: &[Message]) -> bool {
    if messages.first().is_some_and(|first| first.role != Role::User) {
        return false;
    }
    messages.windows(2).all(|pair| pair[0].role != pair[1].role)
}

fn message_from_payload(payload: &Payload) -> Option<Message> {
    let Payload::Conversational(conversational) = payload else {
        return None;
    };
    let Content::Text(text) = &conversational.content else {
        return None;
    };
    let role = Role::from_store(&conversational.role)?;
    Some(Message::new(role, text.clone()))
}

#[cfg(test)]
mod tests {
    use super::{is_alternating, normalize};
    use crate::types::Message;
    use chrono::Utc;
    use parley_rs_memory::{Content, Conversational, Event, Payload, StoreRole};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(payload: Vec<Payload>) -> Event {
        Event {
            event_id: uuid::Uuid::new_v4().to_string(),
            memory_id: "memory_a".to_string(),
            actor_id: "alice".to_string(),
            session_id: "s1".to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }

    fn user(text: &str) -> Event {
        event(vec![Payload::text(StoreRole::User, text)])
    }

    fn assistant(text: &str) -> Event {
        event(vec![Payload::text(StoreRole::Assistant, text)])
    }

    #[test]
    fn drops_leading_assistant_after_reversal() {
        let newest_first = vec![assistant("b2"), user("b1"), assistant("a1")];
        assert_eq!(
            normalize(&newest_first, 30),
            vec![Message::user("b1"), Message::assistant("b2")]
        );
    }

    #[test]
    fn keeps_first_of_consecutive_same_role_messages() {
        let newest_first = vec![user("y"), user("x")];
        assert_eq!(normalize(&newest_first, 30), vec![Message::user("x")]);
    }

    #[test]
    fn empty_and_all_assistant_histories_normalize_to_nothing() {
        assert!(normalize(&[], 30).is_empty());
        assert!(normalize(&[assistant("b"), assistant("a")], 30).is_empty());
    }

    #[test]
    fn skips_non_text_payloads_and_foreign_roles() {
        let newest_first = vec![
            assistant("answer"),
            event(vec![Payload::text(StoreRole::Other("tool".into()), "tool output")]),
            event(vec![Payload::Other(json!({ "blob": true }))]),
            event(vec![Payload::Conversational(Conversational {
                role: StoreRole::User,
                content: Content::Other(json!({ "image": "ref" })),
            })]),
            user("question"),
        ];
        assert_eq!(
            normalize(&newest_first, 30),
            vec![Message::user("question"), Message::assistant("answer")]
        );
    }

    #[test]
    fn truncates_before_dropping_leading_assistant() {
        // Chronological: u1 a1 u2 a2; the last three start with a1.
        let newest_first = vec![assistant("a2"), user("u2"), assistant("a1"), user("u1")];
        assert_eq!(
            normalize(&newest_first, 3),
            vec![Message::user("u2"), Message::assistant("a2")]
        );
    }

    #[test]
    fn reads_every_conversational_payload_of_an_event() {
        let newest_first = vec![event(vec![
            Payload::text(StoreRole::User, "q"),
            Payload::text(StoreRole::Assistant, "a"),
        ])];
        assert_eq!(
            normalize(&newest_first, 30),
            vec![Message::user("q"), Message::assistant("a")]
        );
    }

    #[test]
    fn alternation_check() {
        assert!(is_alternating(&[]));
        assert!(is_alternating(&[Message::user("a"), Message::assistant("b")]));
        assert!(!is_alternating(&[Message::assistant("b")]));
        assert!(!is_alternating(&[Message::user("a"), Message::user("b")]));
    }
}
