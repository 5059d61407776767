//! Configuration model and loading for Parley.
//!
//! Settings are read once at startup from an optional JSON5 file and the
//! process environment, validated, and then handed to the orchestrator as an
//! immutable value.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Environment variable names understood by the loader.
pub use loader::env_keys;
/// Configuration schema models.
pub use model::*;
