//! Tests for settings loading.

use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use tempfile::TempDir;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

/// A minimal file with the required identifiers parses with defaults.
#[test]
fn parse_minimal_config() {
    let json5 = r#"{ memory_id: "memory_abc", preference_strategy_name: "prefs" }"#;
    let settings = AgentSettings::load_from_str(json5).expect("settings");
    assert_eq!(settings.memory_id, "memory_abc");
    assert_eq!(settings.history.max_messages, 30);
    assert_eq!(settings.model.region, "eu-central-1");
}

/// Unknown keys are rejected rather than silently ignored.
#[test]
fn rejects_unknown_top_level_key() {
    let json5 = r#"{ memory_id: "m", preference_strategy_name: "p", unexpected: true }"#;
    let err = AgentSettings::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("unexpected"));
}

/// Missing memory id is a startup error naming the env variable.
#[test]
fn missing_memory_id_is_fatal() {
    let err = AgentSettings::load_with_lookup(
        None,
        lookup_from(&[(env_keys::PREFERENCE_STRATEGY_NAME, "prefs")]),
    )
    .unwrap_err();
    match err {
        ConfigError::MissingField { name, env } => {
            assert_eq!(name, "memory_id");
            assert_eq!(env, "MEMORY_ID");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Missing strategy name is a startup error.
#[test]
fn missing_strategy_name_is_fatal() {
    let err = AgentSettings::load_with_lookup(None, lookup_from(&[(env_keys::MEMORY_ID, "m")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { ref name, .. } if name == "preference_strategy_name"));
}

/// Environment values win over the file; blank values are ignored.
#[test]
fn environment_overrides_file_values() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("parley.json5");
    fs::write(
        &path,
        r#"{
            memory_id: "memory_file",
            preference_strategy_name: "file_prefs",
            model: { id: "file-model" },
            history: { max_messages: 12 },
        }"#,
    )
    .expect("write");

    let settings = AgentSettings::load_with_lookup(
        Some(&path),
        lookup_from(&[
            (env_keys::MEMORY_ID, "memory_env"),
            (env_keys::PREFERENCE_STRATEGY_NAME, "  "),
            (env_keys::PREFERENCE_LIMIT, "3"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.memory_id, "memory_env");
    assert_eq!(settings.preference_strategy_name, "file_prefs");
    assert_eq!(settings.model.id, "file-model");
    assert_eq!(settings.history.max_messages, 12);
    assert_eq!(settings.history.preference_limit, 3);
    assert_eq!(settings.memory_strategy_id(), "file_prefs_env");
}

/// Non-numeric limits are reported against the env key.
#[test]
fn rejects_non_numeric_history_limit() {
    let err = AgentSettings::load_with_lookup(
        None,
        lookup_from(&[
            (env_keys::MEMORY_ID, "m"),
            (env_keys::PREFERENCE_STRATEGY_NAME, "p"),
            (env_keys::HISTORY_LIMIT, "many"),
        ]),
    )
    .unwrap_err();
    assert!(format!("{err}").contains("PARLEY_HISTORY_LIMIT"));
}

/// A zero history window is rejected.
#[test]
fn rejects_zero_history_window() {
    let json5 = r#"{ memory_id: "m", preference_strategy_name: "p", history: { max_messages: 0 } }"#;
    let err = AgentSettings::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("history.max_messages"));
}
