//! Ports (trait boundaries) consumed and exposed by the scoring core.

pub mod engine;
pub mod prompt_source;
pub mod score_store;

pub use engine::{GenerationParams, InferenceEngine};
pub use prompt_source::PromptSource;
pub use score_store::ScoreStore;
