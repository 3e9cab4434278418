//! Assistant configuration.

use std::time::Duration;

use scentvault_core::defaults;

/// Timeouts and result caps for the assistant flows.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Upper bound for one generation call.
    pub gen_timeout: Duration,
    /// Upper bound for one full catalog read.
    pub store_timeout: Duration,
    /// Cap of `searchCatalog` in the admin flow.
    pub search_limit: usize,
    /// Cap of `searchCatalog` in the public flow.
    pub public_search_limit: usize,
    /// Cap of `findMixIngredients`.
    pub mix_limit: usize,
    /// Candidate cap of the recommender.
    pub recommend_limit: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            gen_timeout: Duration::from_secs(defaults::GEN_TIMEOUT_SECS),
            store_timeout: Duration::from_secs(defaults::STORE_TIMEOUT_SECS),
            search_limit: defaults::SEARCH_LIMIT,
            public_search_limit: defaults::PUBLIC_SEARCH_LIMIT,
            mix_limit: defaults::MIX_LIMIT,
            recommend_limit: defaults::RECOMMEND_LIMIT,
        }
    }
}

impl AssistantConfig {
    /// Load from `SCENTVAULT_*` environment variables, falling back to defaults.
    ///
    /// Zero is not a usable cap or timeout and falls back as well.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            gen_timeout: env_positive::<u64>("SCENTVAULT_GEN_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(base.gen_timeout),
            store_timeout: env_positive::<u64>("SCENTVAULT_STORE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(base.store_timeout),
            search_limit: env_positive("SCENTVAULT_SEARCH_LIMIT").unwrap_or(base.search_limit),
            public_search_limit: env_positive("SCENTVAULT_PUBLIC_SEARCH_LIMIT")
                .unwrap_or(base.public_search_limit),
            mix_limit: env_positive("SCENTVAULT_MIX_LIMIT").unwrap_or(base.mix_limit),
            recommend_limit: base.recommend_limit,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_positive<T: std::str::FromStr + PartialOrd + Default>(key: &str) -> Option<T> {
    env_parse::<T>(key).filter(|v| *v > T::default())
}
