//! Memory record store contract and local implementation for Parley.

pub mod error;
pub mod model;
pub mod namespace;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Event and preference record model.
pub use model::{Content, Conversational, Event, Payload, PreferenceRecord, SessionKey, StoreRole};
/// Namespace helpers for preference and summary records.
pub use namespace::{preference_namespace, session_namespace};
/// Store interface and default file implementation.
pub use store::{FileMemoryStore, MemoryStore};
