//! Wiring for the Parley agent binary.
//!
//! Re-exports the workspace crates and provides the small helpers the binary
//! uses to turn settings into a running orchestrator.

/// Re-export for convenience.
pub use parley_rs_config as config;
pub use parley_rs_core as core;
/// Re-export for convenience.
pub use parley_rs_memory as memory;
pub use parley_rs_server as server;

use autoagents_llm::LLMProvider;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use autoagents_llm::error::LLMError;
use log::info;
use parley_rs_config::AgentSettings;
use parley_rs_core::{LlmGateway, SessionOrchestrator};
use parley_rs_memory::{FileMemoryStore, MemoryError, MemoryStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Store root used when the settings do not name one.
pub const DEFAULT_MEMORY_PATH: &str = ".parley/memory";

/// Initialize env_logger with millisecond timestamps and `RUST_LOG` filtering.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}

/// Resolve the file store root from settings.
pub fn memory_root(settings: &AgentSettings) -> PathBuf {
    PathBuf::from(
        settings
            .store
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_MEMORY_PATH.to_string()),
    )
}

/// Open the file-backed memory store named by the settings.
pub fn open_store(settings: &AgentSettings) -> Result<FileMemoryStore, MemoryError> {
    FileMemoryStore::new(memory_root(settings))
}

/// Build the chat provider for the configured model.
pub fn build_llm(
    settings: &AgentSettings,
    api_key: impl Into<String>,
) -> Result<Arc<dyn LLMProvider>, LLMError> {
    info!(
        "building LLM provider (model={}, base_url_set={})",
        settings.model.id,
        settings.model.base_url.is_some()
    );
    let mut builder = LLMBuilder::<OpenAI>::new()
        .api_key(api_key)
        .model(settings.model.id.clone());
    if let Some(base_url) = settings.model.base_url.as_ref() {
        builder = builder.base_url(base_url.clone());
    }
    let llm: Arc<dyn LLMProvider> = builder.build()?;
    Ok(llm)
}

/// Assemble an orchestrator over a store and an LLM provider.
pub fn build_orchestrator(
    settings: AgentSettings,
    store: Arc<dyn MemoryStore>,
    llm: Arc<dyn LLMProvider>,
) -> SessionOrchestrator {
    let gateway = LlmGateway::new(llm, settings.model.id.clone(), settings.model.region.clone());
    SessionOrchestrator::new(settings, store, Arc::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MEMORY_PATH, memory_root, open_store};
    use parley_rs_config::{AgentSettings, StoreSettings};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn memory_root_defaults_when_unset() {
        let settings = AgentSettings::builder().build();
        assert_eq!(memory_root(&settings), PathBuf::from(DEFAULT_MEMORY_PATH));
    }

    #[test]
    fn open_store_creates_configured_root() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("nested").join("memory");
        let settings = AgentSettings::builder()
            .store(StoreSettings {
                path: Some(root.to_string_lossy().to_string()),
            })
            .build();
        open_store(&settings).expect("store");
        assert!(root.is_dir());
    }
}
