//! Core traits for ScentVault abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// CATALOG REPOSITORY TRAITS
// =============================================================================

/// Repository owning the perfume catalog.
///
/// The assistant only ever calls [`CatalogRepository::list_all`]; the write
/// operations back the admin API and are last-write-wins.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Read every catalog entry, ordered by display number then name.
    async fn list_all(&self) -> Result<Vec<Perfume>>;

    /// Fetch one entry by id.
    async fn get(&self, id: &str) -> Result<Option<Perfume>>;

    /// Add an entry and return its store-generated id.
    async fn insert(&self, input: PerfumeInput) -> Result<String>;

    /// Replace every editable field of an existing entry.
    async fn update(&self, id: &str, input: PerfumeInput) -> Result<()>;

    /// Remove an entry.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Number of stored entries.
    async fn count(&self) -> Result<i64>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Chat-capable generation backend (LLM) with optional tool calling and
/// schema-constrained output.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a conversation; the model either answers or invokes one tool.
    async fn chat(&self, request: ChatRequest) -> Result<ModelReply>;

    /// Generate a JSON value conforming to `schema`.
    ///
    /// Returns `Ok(None)` when the model produced no parseable output.
    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &JsonValue,
    ) -> Result<Option<JsonValue>>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
