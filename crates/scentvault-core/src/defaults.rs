//! Centralized default constants for ScentVault.
//!
//! All crates and the API server reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// RELEVANCE FILTER
// =============================================================================

/// Query tokens with this many characters or fewer are discarded.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Result cap for the admin `searchCatalog` tool.
pub const SEARCH_LIMIT: usize = 10;

/// Result cap for the public `searchCatalog` tool.
pub const PUBLIC_SEARCH_LIMIT: usize = 5;

/// Result cap for the `findMixIngredients` tool.
pub const MIX_LIMIT: usize = 5;

/// Candidate cap for the standalone recommender.
pub const RECOMMEND_LIMIT: usize = 5;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum request body size in bytes (1 MiB covers attached file previews).
pub const MAX_BODY_SIZE_BYTES: usize = 1024 * 1024;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model name (Ollama). Must support tool calling.
pub const GEN_MODEL: &str = "qwen3:8b";

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Generation calls slower than this are logged with `slow = true`.
pub const SLOW_GENERATION_MS: u64 = 30_000;

// =============================================================================
// CATALOG STORE
// =============================================================================

/// Timeout for a full catalog read in seconds.
pub const STORE_TIMEOUT_SECS: u64 = 15;
