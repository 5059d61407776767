//! Test helpers shared across Parley crates.

pub mod gateway;
pub mod llm;
pub mod memory;

pub use gateway::{FailingGateway, FixedGateway, GatewayCall, RecordingGateway};
pub use llm::{FailingLLM, FixedChatResponse, FixedLLM, RecordingChatLLM};
pub use memory::{PreferenceQuery, StoreFailures, StubStore};
