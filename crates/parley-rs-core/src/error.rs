//! Error types for the conversation core.

use crate::gateway::GatewayError;
use thiserror::Error;

/// Errors that end a single invocation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Inbound request is missing a required field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Assembled transcript violates the alternation contract.
    #[error("normalization error: {0}")]
    Normalization(String),
    /// Model gateway invocation or response extraction failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
