//! Inference engine adapters.

pub mod llama_http;
pub mod mock;

pub use llama_http::LlamaHttpEngine;
pub use mock::{MockEngine, MockReply};
