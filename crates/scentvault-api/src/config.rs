//! Server configuration from environment variables.

use std::path::PathBuf;

use axum::http::HeaderValue;
use scentvault_core::{defaults, Error, Result};

/// Where the catalog lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for CatalogBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!(
                "Unknown CATALOG_BACKEND '{}' (expected postgres or memory)",
                other
            ))),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub catalog_backend: CatalogBackend,
    /// JSON file used to seed an empty catalog.
    pub seed_catalog: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u64,
    pub rate_limit_period_secs: u64,
    pub max_body_size_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: defaults::SERVER_PORT,
            database_url: "postgres://localhost/scentvault".to_string(),
            catalog_backend: CatalogBackend::Postgres,
            seed_catalog: None,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            rate_limit_enabled: true,
            rate_limit_requests: defaults::RATE_LIMIT_REQUESTS,
            rate_limit_period_secs: defaults::RATE_LIMIT_PERIOD_SECS,
            max_body_size_bytes: defaults::MAX_BODY_SIZE_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let base = Self::default();
        Ok(Self {
            host: std::env::var("HOST").unwrap_or(base.host),
            port: env_parse("PORT").unwrap_or(base.port),
            database_url: std::env::var("DATABASE_URL").unwrap_or(base.database_url),
            catalog_backend: std::env::var("CATALOG_BACKEND")
                .unwrap_or_default()
                .parse()?,
            seed_catalog: std::env::var("SEED_CATALOG")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| split_origins(&s))
                .filter(|o| !o.is_empty())
                .unwrap_or(base.allowed_origins),
            rate_limit_enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(base.rate_limit_enabled),
            rate_limit_requests: env_parse("RATE_LIMIT_REQUESTS")
                .unwrap_or(base.rate_limit_requests),
            rate_limit_period_secs: env_parse("RATE_LIMIT_PERIOD_SECS")
                .unwrap_or(base.rate_limit_period_secs),
            max_body_size_bytes: env_parse("MAX_BODY_SIZE_BYTES")
                .unwrap_or(base.max_body_size_bytes),
        })
    }

    /// Allowed origins as header values; invalid entries are skipped.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect()
    }
}

fn split_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
