//! HTTP inference engine adapter for a llama.cpp-style completion server.
//!
//! Speaks the server's `/health` and `/completion` endpoints. Each completion
//! request is self-contained, so `reset` has nothing remote to clear; it
//! exists for engines that keep KV/conversation state between calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EngineConfig;
use crate::domain::ports::{GenerationParams, InferenceEngine};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    temperature: f32,
    n_predict: u32,
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Inference engine backed by a llama.cpp HTTP server.
pub struct LlamaHttpEngine {
    client: reqwest::Client,
    config: EngineConfig,
    connected: AtomicBool,
}

impl LlamaHttpEngine {
    pub fn new(config: EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            config,
            connected: AtomicBool::new(false),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl InferenceEngine for LlamaHttpEngine {
    async fn connect(&self) -> DomainResult<bool> {
        if self.connected.load(Ordering::SeqCst) {
            return Ok(true);
        }
        let response = self.client.get(self.endpoint("/health")).send().await?;
        if response.status().is_success() {
            self.connected.store(true, Ordering::SeqCst);
            tracing::info!(base_url = self.config.base_url, "engine ready");
            Ok(true)
        } else {
            tracing::warn!(status = %response.status(), "engine health check failed");
            Ok(false)
        }
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> DomainResult<String> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(DomainError::EngineNotConnected);
        }
        let request = CompletionRequest {
            prompt,
            temperature: params.temperature,
            n_predict: params.max_tokens,
            stop: &params.stop,
        };
        let response = self
            .client
            .post(self.endpoint("/completion"))
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::GenerationFailed(format!(
                "completion request failed with {status}: {body}"
            )));
        }
        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| DomainError::GenerationFailed(e.to_string()))?;
        Ok(completion.content)
    }

    async fn reset(&self) -> DomainResult<()> {
        // Stateless transport; safe even when never connected.
        tracing::debug!("engine reset (stateless transport, nothing to clear)");
        Ok(())
    }

    async fn disconnect(&self) -> DomainResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        tracing::info!("engine disconnected");
        Ok(())
    }
}
