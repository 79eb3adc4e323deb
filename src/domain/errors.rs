//! Domain errors for the resilens scoring pipeline.

use thiserror::Error;

/// Domain-level errors that can occur while scoring a filing.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Engine not connected")]
    EngineNotConnected,

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            DomainError::EngineUnavailable(err.to_string())
        } else {
            DomainError::GenerationFailed(err.to_string())
        }
    }
}
