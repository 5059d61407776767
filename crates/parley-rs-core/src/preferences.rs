//! Long-term preference lookup and rendering.

use log::debug;
use parley_rs_memory::{Content, MemoryError, MemoryStore, PreferenceRecord, preference_namespace};
use std::sync::Arc;

/// Fetches an actor's preference records and renders them as prompt text.
#[derive(Clone)]
pub struct PreferenceResolver {
    store: Arc<dyn MemoryStore>,
    memory_id: String,
    strategy_id: String,
    limit: usize,
}

impl PreferenceResolver {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        memory_id: impl Into<String>,
        strategy_id: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            store,
            memory_id: memory_id.into(),
            strategy_id: strategy_id.into(),
            limit,
        }
    }

    /// Strategy id records are looked up under.
    pub fn strategy_id(&self) -> &str {
        &self.strategy_id
    }

    /// Resolve the preference text for an actor; empty when none are stored.
    pub async fn resolve(&self, actor_id: &str) -> Result<String, MemoryError> {
        let namespace = preference_namespace(&self.strategy_id, actor_id);
        let records = self
            .store
            .list_preference_records(&self.memory_id, &namespace, &self.strategy_id, self.limit)
            .await?;
        let rendered = render_preferences(&records);
        debug!(
            "resolved preferences (actor_id={}, records={}, text_len={})",
            actor_id,
            records.len(),
            rendered.len()
        );
        Ok(rendered)
    }
}

/// Join text records with newlines in store order; other content is skipped.
pub fn render_preferences(records: &[PreferenceRecord]) -> String {
    records
        .iter()
        .filter_map(|record| match &record.content {
            Content::Text(text) => Some(text.as_str()),
            Content::Other(_) => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
