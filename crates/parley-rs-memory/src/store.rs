//! Memory store interface and file-backed implementation.

use crate::error::MemoryError;
use crate::model::{Content, Event, Payload, PreferenceRecord, SessionKey, StoreRole};
use crate::namespace;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const RECORDS_FILE: &str = "records.jsonl";

/// Durable event log plus long-term record namespace.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Append a conversational event and return its id.
    async fn append_event(
        &self,
        key: SessionKey<'_>,
        role: StoreRole,
        text: &str,
    ) -> Result<String, MemoryError>;

    /// List events for a session, newest first.
    async fn list_events(&self, key: SessionKey<'_>) -> Result<Vec<Event>, MemoryError>;

    /// List up to `limit` long-term records under a namespace, in store order.
    async fn list_preference_records(
        &self,
        memory_id: &str,
        namespace: &str,
        strategy_id: &str,
        limit: usize,
    ) -> Result<Vec<PreferenceRecord>, MemoryError>;

    /// Add a long-term record, for stores that accept them directly.
    async fn put_preference_record(
        &self,
        memory_id: &str,
        record: PreferenceRecord,
    ) -> Result<(), MemoryError> {
        let _ = (memory_id, record);
        Err(MemoryError::Unavailable(
            "store does not accept preference records".to_string(),
        ))
    }
}

/// File-backed store keeping one JSONL file per session and per namespace.
#[derive(Debug)]
pub struct FileMemoryStore {
    /// Root directory for all memories.
    root: PathBuf,
    /// Serializes appends across concurrent requests.
    write_lock: Mutex<()>,
}

impl FileMemoryStore {
    /// Create a new file-backed store under the given root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file memory store (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Path to the session JSONL file.
    fn session_path(&self, key: SessionKey<'_>) -> Result<PathBuf, MemoryError> {
        Ok(self
            .root
            .join(checked("memory_id", key.memory_id)?)
            .join("actors")
            .join(checked("actor_id", key.actor_id)?)
            .join("sessions")
            .join(format!("{}.jsonl", checked("session_id", key.session_id)?)))
    }

    /// Path to the records file for a namespace.
    fn namespace_path(&self, memory_id: &str, namespace: &str) -> Result<PathBuf, MemoryError> {
        let mut path = self.root.join(checked("memory_id", memory_id)?);
        let segments = namespace::segments(namespace);
        if segments.is_empty() {
            return Err(MemoryError::InvalidIdentifier {
                field: "namespace",
                value: namespace.to_string(),
            });
        }
        for segment in segments {
            path.push(checked("namespace", segment)?);
        }
        Ok(path.join(RECORDS_FILE))
    }

    fn append_line<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), MemoryError> {
        let line = serde_json::to_string(value)?;
        let _guard = self.write_lock.lock();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for FileMemoryStore {
    async fn append_event(
        &self,
        key: SessionKey<'_>,
        role: StoreRole,
        text: &str,
    ) -> Result<String, MemoryError> {
        if let StoreRole::Other(value) = &role {
            return Err(MemoryError::UnsupportedRole(value.clone()));
        }
        let path = self.session_path(key)?;
        let event = Event {
            event_id: Uuid::new_v4().to_string(),
            memory_id: key.memory_id.to_string(),
            actor_id: key.actor_id.to_string(),
            session_id: key.session_id.to_string(),
            timestamp: Utc::now(),
            payload: vec![Payload::text(role, text)],
        };
        self.append_line(&path, &event)?;
        debug!(
            "stored event (actor_id={}, session_id={}, event_id={}, text_len={})",
            key.actor_id,
            key.session_id,
            event.event_id,
            text.len()
        );
        Ok(event.event_id)
    }

    async fn list_events(&self, key: SessionKey<'_>) -> Result<Vec<Event>, MemoryError> {
        let path = self.session_path(key)?;
        let mut events: Vec<Event> = read_lines(&path)?;
        events.reverse();
        debug!(
            "listed events (actor_id={}, session_id={}, returned={})",
            key.actor_id,
            key.session_id,
            events.len()
        );
        Ok(events)
    }

    async fn list_preference_records(
        &self,
        memory_id: &str,
        namespace: &str,
        strategy_id: &str,
        limit: usize,
    ) -> Result<Vec<PreferenceRecord>, MemoryError> {
        let path = self.namespace_path(memory_id, namespace)?;
        let records: Vec<PreferenceRecord> = read_lines(&path)?;
        let records: Vec<PreferenceRecord> = records
            .into_iter()
            .filter(|record| record.strategy_id == strategy_id)
            .take(limit)
            .collect();
        debug!(
            "listed preference records (namespace={}, returned={})",
            namespace,
            records.len()
        );
        Ok(records)
    }

    async fn put_preference_record(
        &self,
        memory_id: &str,
        record: PreferenceRecord,
    ) -> Result<(), MemoryError> {
        let path = self.namespace_path(memory_id, &record.namespace)?;
        self.append_line(&path, &record)?;
        let kind = match &record.content {
            Content::Text(_) => "text",
            Content::Other(_) => "other",
        };
        debug!(
            "stored preference record (namespace={}, record_id={}, kind={})",
            record.namespace, record.record_id, kind
        );
        Ok(())
    }
}

/// Reject identifiers that would escape or collapse a path component.
fn checked<'a>(field: &'static str, value: &'a str) -> Result<&'a str, MemoryError> {
    let invalid = value.trim().is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if invalid {
        return Err(MemoryError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Load all JSONL entries from a file; a missing file is empty.
fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, MemoryError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = OpenOptions::new().read(true).open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}
