//! Environment variable overlay.

use super::invalid;
use crate::{AgentSettings, ConfigError};
use log::debug;

/// Environment variable names read by the loader.
pub mod keys {
    pub const MEMORY_ID: &str = "MEMORY_ID";
    pub const PREFERENCE_STRATEGY_NAME: &str = "MEMORY_USER_PREFERENCES_STRATEGY_NAME";
    pub const SYSTEM_PROMPT: &str = "SYSTEM_PROMPT";
    pub const MODEL_ID: &str = "MODEL_ID";
    pub const MODEL_REGION: &str = "MODEL_REGION";
    pub const MODEL_BASE_URL: &str = "MODEL_BASE_URL";
    pub const BIND: &str = "PARLEY_BIND";
    pub const MEMORY_PATH: &str = "PARLEY_MEMORY_PATH";
    pub const HISTORY_LIMIT: &str = "PARLEY_HISTORY_LIMIT";
    pub const PREFERENCE_LIMIT: &str = "PARLEY_PREFERENCE_LIMIT";
}

/// Apply non-empty environment values on top of the given settings.
pub(super) fn apply_overrides<F>(
    mut settings: AgentSettings,
    lookup: F,
) -> Result<AgentSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(value) = read(keys::MEMORY_ID) {
        settings.memory_id = value;
    }
    if let Some(value) = read(keys::PREFERENCE_STRATEGY_NAME) {
        settings.preference_strategy_name = value;
    }
    if let Some(value) = read(keys::SYSTEM_PROMPT) {
        settings.system_prompt = value;
    }
    if let Some(value) = read(keys::MODEL_ID) {
        settings.model.id = value;
    }
    if let Some(value) = read(keys::MODEL_REGION) {
        settings.model.region = value;
    }
    if let Some(value) = read(keys::MODEL_BASE_URL) {
        settings.model.base_url = Some(value);
    }
    if let Some(value) = read(keys::BIND) {
        settings.server.bind = value;
    }
    if let Some(value) = read(keys::MEMORY_PATH) {
        settings.store.path = Some(value);
    }
    if let Some(value) = read(keys::HISTORY_LIMIT) {
        settings.history.max_messages = parse_count(keys::HISTORY_LIMIT, &value)?;
    }
    if let Some(value) = read(keys::PREFERENCE_LIMIT) {
        settings.history.preference_limit = parse_count(keys::PREFERENCE_LIMIT, &value)?;
    }
    debug!("applied environment overrides");
    Ok(settings)
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse::<usize>()
        .map_err(|err| invalid(key, format!("expected a non-negative integer: {err}")))
}
