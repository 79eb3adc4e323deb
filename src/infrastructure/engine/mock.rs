//! Scripted mock engine for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{GenerationParams, InferenceEngine};

/// One scripted reply: either generated text or an engine failure.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Error(String),
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        MockReply::Text(content.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        MockReply::Error(message.into())
    }
}

/// Mock inference engine with a scripted reply queue and full call recording.
///
/// Replies are consumed in order; when the queue runs dry the default reply
/// is repeated. Prompts, connects, resets, and disconnects are all counted so
/// tests can assert on isolation and retry behavior.
pub struct MockEngine {
    replies: Mutex<VecDeque<MockReply>>,
    default_reply: MockReply,
    prompts: Mutex<Vec<String>>,
    connect_ok: bool,
    connects: AtomicUsize,
    resets: AtomicUsize,
    disconnects: AtomicUsize,
    connected: AtomicBool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: MockReply::text(
                r#"{"score": 2, "confidence": 1, "evidence": [], "reasoning": "mock"}"#,
            ),
            prompts: Mutex::new(Vec::new()),
            connect_ok: true,
            connects: AtomicUsize::new(0),
            resets: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            connected: AtomicBool::new(false),
        }
    }

    /// Engine whose connect always reports "not ready".
    pub fn unavailable() -> Self {
        Self {
            connect_ok: false,
            ..Self::new()
        }
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_text(&self, content: impl Into<String>) {
        self.push_reply(MockReply::text(content));
    }

    pub fn push_error(&self, message: impl Into<String>) {
        self.push_reply(MockReply::error(message));
    }

    /// All prompts received by `generate`, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn generate_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceEngine for MockEngine {
    async fn connect(&self) -> DomainResult<bool> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.connect_ok {
            self.connected.store(true, Ordering::SeqCst);
        }
        Ok(self.connect_ok)
    }

    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> DomainResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());
        match reply {
            MockReply::Text(content) => Ok(content),
            MockReply::Error(message) => Err(DomainError::GenerationFailed(message)),
        }
    }

    async fn reset(&self) -> DomainResult<()> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> DomainResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
