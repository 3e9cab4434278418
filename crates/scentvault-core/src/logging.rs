//! Structured logging schema and field name constants for ScentVault.
//!
//! All crates use these constants for consistent structured logging fields.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (scored entries) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "search", "db", "inference", "chat"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "relevance", "ollama", "pool", "assistant", "tools", "recipe"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list_all", "chat", "generate_structured", "filter"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Perfume id being operated on.
pub const PERFUME_ID: &str = "perfume_id";

/// Free-text query.
pub const QUERY: &str = "query";

/// Tool name invoked by the model.
pub const TOOL: &str = "tool";

/// Chat flow variant ("admin", "public").
pub const FLOW: &str = "flow";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of catalog entries scanned.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_distinct_snake_case() {
        let fields = [
            REQUEST_ID, SUBSYSTEM, COMPONENT, OPERATION, PERFUME_ID, QUERY, TOOL, FLOW,
            DURATION_MS, RESULT_COUNT, CANDIDATE_COUNT, PROMPT_LEN, RESPONSE_LEN, POOL_SIZE,
            POOL_IDLE, MODEL, ERROR_MSG, SLOW,
        ];
        let mut seen = std::collections::HashSet::new();
        for f in fields {
            assert!(f.chars().all(|c| c.is_ascii_lowercase() || c == '_'), "{}", f);
            assert!(seen.insert(f), "duplicate field {}", f);
        }
    }
}
