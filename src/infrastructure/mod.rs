//! Infrastructure layer: external integrations and adapters.

pub mod config;
pub mod engine;
pub mod logging;
pub mod prompts;
pub mod store;

pub use config::{ConfigError, ConfigLoader};
pub use engine::{LlamaHttpEngine, MockEngine, MockReply};
pub use prompts::{FilePromptSource, StaticPromptSource};
pub use store::JsonScoreStore;
