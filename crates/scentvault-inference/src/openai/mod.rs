//! OpenAI-compatible chat backend.
//!
//! Works with any endpoint that speaks the chat-completions protocol with
//! `tools` and `response_format: json_schema` (OpenAI, OpenRouter, vLLM,
//! LM Studio, Ollama's `/v1` compatibility layer).
//!
//! # Example
//!
//! ```rust,no_run
//! use scentvault_inference::openai::{OpenAIBackend, OpenAIConfig};
//!
//! let config = OpenAIConfig {
//!     base_url: "http://localhost:11434/v1".to_string(),
//!     api_key: None,
//!     gen_model: "qwen3:8b".to_string(),
//!     ..Default::default()
//! };
//! let backend = OpenAIBackend::new(config).unwrap();
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_scentvault_error, OpenAIErrorCode};
pub use types::*;
