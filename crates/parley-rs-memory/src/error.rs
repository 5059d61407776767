//! Error types for memory store operations.

/// Errors returned by memory stores and helpers.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Identifier cannot be used as a storage key.
    #[error("invalid identifier for {field}: {value:?}")]
    InvalidIdentifier { field: &'static str, value: String },
    /// Role is not accepted for conversational events.
    #[error("unsupported role: {0}")]
    UnsupportedRole(String),
    /// The store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
