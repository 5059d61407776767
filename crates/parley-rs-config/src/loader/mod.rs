//! Settings loader: optional JSON5 file, environment overlay, validation.
//!
//! Precedence (low -> high): built-in defaults, config file, environment.

mod env;

#[cfg(test)]
mod tests;

use crate::{AgentSettings, ConfigError};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub use env::keys as env_keys;

impl AgentSettings {
    /// Load settings from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_lookup(path, |key| std::env::var(key).ok())
    }

    /// Load settings from the process environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load settings from an optional file and an injected environment lookup.
    pub fn load_with_lookup<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match path {
            Some(path) => {
                info!("loading config from path: {}", path.display());
                let contents = fs::read_to_string(path)?;
                parse_settings(&contents)?
            }
            None => {
                debug!("no config file supplied; starting from defaults");
                AgentSettings::default()
            }
        };
        let settings = env::apply_overrides(base, lookup)?;
        settings.validate()?;
        info!(
            "config loaded (memory_id={}, strategy={}, model={}, region={})",
            settings.memory_id,
            settings.preference_strategy_name,
            settings.model.id,
            settings.model.region
        );
        Ok(settings)
    }

    /// Load settings from JSON5 contents without consulting the environment.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let settings = parse_settings(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                name: "memory_id".to_string(),
                env: env_keys::MEMORY_ID.to_string(),
            });
        }
        if self.preference_strategy_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                name: "preference_strategy_name".to_string(),
                env: env_keys::PREFERENCE_STRATEGY_NAME.to_string(),
            });
        }
        if self.model.id.trim().is_empty() {
            return Err(invalid("model.id", "must not be empty"));
        }
        if self.history.max_messages == 0 {
            return Err(invalid("history.max_messages", "must be greater than zero"));
        }
        if self.history.preference_limit == 0 {
            return Err(invalid(
                "history.preference_limit",
                "must be greater than zero",
            ));
        }
        if self.server.bind.trim().is_empty() {
            return Err(invalid("server.bind", "must not be empty"));
        }
        Ok(())
    }
}

fn parse_settings(contents: &str) -> Result<AgentSettings, ConfigError> {
    let value: Value = json5::from_str(contents)?;
    let settings: AgentSettings = serde_json::from_value(value)?;
    Ok(settings)
}

pub(crate) fn invalid(path: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.into(),
    }
}
