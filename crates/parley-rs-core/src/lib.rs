//! Conversation core for Parley.
//!
//! This crate owns history normalization, preference resolution, system prompt
//! composition, the model gateway seam, and the per-request session
//! orchestrator used by the HTTP server.

pub mod error;
pub mod gateway;
pub mod normalize;
pub mod orchestrator;
pub mod preferences;
pub mod prompt;
pub mod types;

pub use error::CoreError;
pub use gateway::{ContentBlock, GatewayError, GatewayOutput, LlmGateway, ModelGateway, extract_text};
pub use normalize::{is_alternating, normalize};
pub use orchestrator::{
    InvocationOutcome, PersistenceReport, SessionOrchestrator, TurnStage, outbound_messages,
};
pub use preferences::{PreferenceResolver, render_preferences};
pub use prompt::compose_system_prompt;
pub use types::{InvocationRequest, Message, Role};
