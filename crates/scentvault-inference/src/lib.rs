//! # scentvault-inference
//!
//! Chat backends for the ScentVault assistant.
//!
//! This crate provides:
//! - Ollama implementation over `/api/chat` (default)
//! - OpenAI-compatible implementation (optional, feature `openai`)
//! - Scripted mock backend (feature `mock`)
//! - Backend selection from `INFERENCE_BACKEND`
//!
//! Every backend supports tool calling (`ChatBackend::chat`) and
//! schema-constrained JSON output (`ChatBackend::generate_structured`).
//!
//! # Feature Flags
//!
//! - `ollama` (default): Enable Ollama backend
//! - `openai`: Enable OpenAI-compatible backend
//! - `mock`: Export [`mock::MockChatBackend`] for downstream tests
//!
//! # Example
//!
//! ```rust,no_run
//! use scentvault_inference::backend_from_env;
//!
//! let backend = backend_from_env().unwrap();
//! println!("using {}", backend.model_name());
//! ```

pub mod json;
pub mod provider;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use scentvault_core::{ChatBackend, ChatRequest, ModelReply};

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};

pub use provider::{backend_from_env, build_backend, BackendKind};
