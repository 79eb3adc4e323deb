//! Inference engine port.
//!
//! Abstracts the text-generation backend (llama.cpp HTTP server in
//! production, scripted mock in tests). All four lifecycle operations are
//! fallible; `reset` and `disconnect` must be safe to call even if the engine
//! was never successfully connected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;

/// Parameters for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature; kept low for scoring determinism.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Stop sequences to curb over-generation past the closing brace.
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1500,
            stop: vec!["}```".to_string(), "\n\n\n".to_string()],
        }
    }
}

/// Text-generation backend consumed by the scoring pipeline.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Ensure the engine is ready. Idempotent; returns `Ok(false)` when the
    /// backend is reachable but not usable.
    async fn connect(&self) -> DomainResult<bool>;

    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> DomainResult<String>;

    /// Clear any conversation/context state. Called between role evaluations
    /// to enforce context isolation.
    async fn reset(&self) -> DomainResult<()>;

    /// Release the engine resource. Safe to call when never connected.
    async fn disconnect(&self) -> DomainResult<()>;
}
