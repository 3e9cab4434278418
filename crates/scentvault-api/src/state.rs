//! Shared application state.

use std::sync::Arc;

use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

use scentvault_chat::PerfumeAssistant;
use scentvault_core::{CatalogRepository, ChatBackend, Error, Result};

use crate::config::ServerConfig;

/// Global rate limiter type (direct quota, no keyed bucketing).
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub backend: Arc<dyn ChatBackend>,
    pub assistant: PerfumeAssistant,
    /// None when rate limiting is disabled.
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        backend: Arc<dyn ChatBackend>,
        assistant: PerfumeAssistant,
    ) -> Self {
        Self {
            catalog,
            backend,
            assistant,
            rate_limiter: None,
        }
    }

    /// Attach the global rate limiter described by `config`, if enabled.
    pub fn with_rate_limit(mut self, config: &ServerConfig) -> Result<Self> {
        if !config.rate_limit_enabled {
            return Ok(self);
        }

        let burst = u32::try_from(config.rate_limit_requests)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| Error::Config("RATE_LIMIT_REQUESTS must be 1..=u32::MAX".to_string()))?;
        let quota = Quota::with_period(std::time::Duration::from_secs(
            config.rate_limit_period_secs,
        ))
        .ok_or_else(|| Error::Config("RATE_LIMIT_PERIOD_SECS must be non-zero".to_string()))?
        .allow_burst(burst);

        self.rate_limiter = Some(Arc::new(RateLimiter::direct(quota)));
        Ok(self)
    }
}
