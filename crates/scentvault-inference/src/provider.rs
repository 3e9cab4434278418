//! Backend selection from configuration.
//!
//! `INFERENCE_BACKEND` picks the provider:
//!
//! ```text
//! ollama   → OllamaBackend (default)
//! openai   → OpenAIBackend (requires feature `openai`)
//! ```

use std::sync::Arc;

use tracing::info;

use scentvault_core::{ChatBackend, Error, Result};

/// Known chat backend providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Ollama,
    OpenAI,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "ollama" => Ok(Self::Ollama),
            "openai" | "openrouter" => Ok(Self::OpenAI),
            other => Err(Error::Config(format!(
                "Unknown INFERENCE_BACKEND '{}' (expected ollama or openai)",
                other
            ))),
        }
    }
}

impl BackendKind {
    /// Read `INFERENCE_BACKEND`, defaulting to Ollama.
    pub fn from_env() -> Result<Self> {
        std::env::var("INFERENCE_BACKEND")
            .unwrap_or_default()
            .parse()
    }
}

/// Build the configured chat backend.
pub fn backend_from_env() -> Result<Arc<dyn ChatBackend>> {
    let kind = BackendKind::from_env()?;
    info!(backend = %kind, "Selecting chat backend");
    build_backend(kind)
}

/// Build a chat backend of the given kind from its environment settings.
pub fn build_backend(kind: BackendKind) -> Result<Arc<dyn ChatBackend>> {
    match kind {
        #[cfg(feature = "ollama")]
        BackendKind::Ollama => Ok(Arc::new(crate::ollama::OllamaBackend::from_env()?)),
        #[cfg(feature = "openai")]
        BackendKind::OpenAI => Ok(Arc::new(crate::openai::OpenAIBackend::from_env()?)),
        #[allow(unreachable_patterns)]
        other => Err(Error::Config(format!(
            "Backend '{}' is not compiled in (enable the '{}' feature)",
            other, other
        ))),
    }
}
