//! Configuration schema for Parley.

use serde::{Deserialize, Serialize};

/// Base instruction text used when no system prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly AI assistant. You are here to help users with there questions. You rely on your knowledge of the world to help them to the best of your abilities.";
/// Model identifier used when none is configured.
pub const DEFAULT_MODEL_ID: &str = "gpt-4.1";
/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "eu-central-1";
/// Listen address used when none is configured.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Prefix carried by memory store identifiers.
const MEMORY_ID_PREFIX: &str = "memory_";

/// Root settings for the agent process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentSettings {
    /// Memory store identifier (for example `memory_itp2x-N5PjG7Adx9`).
    #[serde(default)]
    pub memory_id: String,
    /// Name of the preference extraction strategy (for example `preference_builtin`).
    #[serde(default)]
    pub preference_strategy_name: String,
    /// Base system prompt sent with every completion.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub store: StoreSettings,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            memory_id: String::new(),
            preference_strategy_name: String::new(),
            system_prompt: default_system_prompt(),
            model: ModelSettings::default(),
            server: ServerSettings::default(),
            history: HistorySettings::default(),
            store: StoreSettings::default(),
        }
    }
}

impl AgentSettings {
    /// Start building settings programmatically with defaults applied.
    pub fn builder() -> AgentSettingsBuilder {
        AgentSettingsBuilder::new()
    }

    /// Strategy identifier derived from the strategy name and memory id suffix.
    ///
    /// `memory_itp2x-N5PjG7Adx9` with `preference_builtin` yields
    /// `preference_builtin_itp2x-N5PjG7Adx9`.
    pub fn memory_strategy_id(&self) -> String {
        strategy_id_for(&self.preference_strategy_name, &self.memory_id)
    }
}

/// Derive a strategy id for any strategy name under the given memory id.
pub fn strategy_id_for(strategy_name: &str, memory_id: &str) -> String {
    let suffix = memory_id
        .strip_prefix(MEMORY_ID_PREFIX)
        .unwrap_or(memory_id);
    format!("{strategy_name}_{suffix}")
}

/// Builder for assembling `AgentSettings` in code.
#[derive(Debug, Default, Clone)]
pub struct AgentSettingsBuilder {
    settings: AgentSettings,
}

impl AgentSettingsBuilder {
    /// Create a new builder seeded with default values.
    pub fn new() -> Self {
        Self {
            settings: AgentSettings::default(),
        }
    }

    /// Set the memory store identifier.
    pub fn memory_id(mut self, memory_id: impl Into<String>) -> Self {
        self.settings.memory_id = memory_id.into();
        self
    }

    /// Set the preference strategy name.
    pub fn preference_strategy_name(mut self, name: impl Into<String>) -> Self {
        self.settings.preference_strategy_name = name.into();
        self
    }

    /// Replace the base system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.settings.system_prompt = prompt.into();
        self
    }

    /// Replace the model settings.
    pub fn model(mut self, model: ModelSettings) -> Self {
        self.settings.model = model;
        self
    }

    /// Replace the server settings.
    pub fn server(mut self, server: ServerSettings) -> Self {
        self.settings.server = server;
        self
    }

    /// Replace the history settings.
    pub fn history(mut self, history: HistorySettings) -> Self {
        self.settings.history = history;
        self
    }

    /// Replace the store settings.
    pub fn store(mut self, store: StoreSettings) -> Self {
        self.settings.store = store;
        self
    }

    /// Finalize and return the built settings.
    pub fn build(self) -> AgentSettings {
        self.settings
    }
}

/// Model invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelSettings {
    #[serde(default = "default_model_id")]
    pub id: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Optional endpoint override for the model provider.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            id: default_model_id(),
            region: default_region(),
            base_url: None,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Bounds applied to history and preference retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HistorySettings {
    /// Maximum number of prior messages sent to the model.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    /// Maximum number of preference records requested per turn.
    #[serde(default = "default_preference_limit")]
    pub preference_limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            preference_limit: default_preference_limit(),
        }
    }
}

/// Local memory store settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreSettings {
    /// Root directory for the file-backed store (defaults to `.parley/memory`).
    #[serde(default)]
    pub path: Option<String>,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_messages() -> usize {
    30
}

fn default_preference_limit() -> usize {
    5
}
