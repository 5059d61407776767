//! Property-based tests for history normalization.
//!
//! For any newest-first event list, `normalize` must:
//! 1. start with a user message and alternate roles,
//! 2. return at most `max_messages` entries drawn in order from the last
//!    `max_messages` chronological messages,
//! 3. leave an already-normalized transcript unchanged.

use chrono::Utc;
use parley_rs_core::{Message, Role, is_alternating, normalize};
use parley_rs_memory::{Event, Payload, StoreRole};
use proptest::prelude::*;

fn role_strategy() -> impl Strategy<Value = StoreRole> {
    prop_oneof![
        4 => Just(StoreRole::User),
        4 => Just(StoreRole::Assistant),
        1 => Just(StoreRole::Other("tool".to_string())),
    ]
}

/// Chronological `(role, text)` turns.
fn turns_strategy() -> impl Strategy<Value = Vec<(StoreRole, String)>> {
    prop::collection::vec((role_strategy(), "[a-z]{1,6}"), 0..60)
}

/// Store events for chronological turns, returned newest first.
fn newest_first(turns: &[(StoreRole, String)]) -> Vec<Event> {
    turns
        .iter()
        .rev()
        .enumerate()
        .map(|(index, (role, text))| Event {
            event_id: format!("e{index}"),
            memory_id: "memory_p".to_string(),
            actor_id: "actor".to_string(),
            session_id: "session".to_string(),
            timestamp: Utc::now(),
            payload: vec![Payload::text(role.clone(), text.clone())],
        })
        .collect()
}

fn as_turns(messages: &[Message]) -> Vec<(StoreRole, String)> {
    messages
        .iter()
        .map(|message| (message.role.to_store(), message.text.clone()))
        .collect()
}

/// Chronological messages after role filtering, before any trimming.
fn chronological(turns: &[(StoreRole, String)]) -> Vec<Message> {
    turns
        .iter()
        .filter_map(|(role, text)| Role::from_store(role).map(|role| Message::new(role, text.clone())))
        .collect()
}

fn is_subsequence(needle: &[Message], haystack: &[Message]) -> bool {
    let mut remaining = haystack.iter();
    needle
        .iter()
        .all(|wanted| remaining.any(|candidate| candidate == wanted))
}

proptest! {
    #[test]
    fn output_alternates_and_opens_with_user(turns in turns_strategy(), max in 1usize..40) {
        let normalized = normalize(&newest_first(&turns), max);
        prop_assert!(is_alternating(&normalized));
    }

    #[test]
    fn output_is_bounded_suffix_selection(turns in turns_strategy(), max in 1usize..40) {
        let normalized = normalize(&newest_first(&turns), max);
        let all = chronological(&turns);
        let window = &all[all.len().saturating_sub(max)..];
        prop_assert!(normalized.len() <= max);
        prop_assert!(is_subsequence(&normalized, window));
    }

    #[test]
    fn renormalizing_is_identity(turns in turns_strategy(), max in 1usize..40) {
        let once = normalize(&newest_first(&turns), max);
        let twice = normalize(&newest_first(&as_turns(&once)), max);
        prop_assert_eq!(once, twice);
    }
}
