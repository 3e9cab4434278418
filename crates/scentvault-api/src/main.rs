//! scentvault-api - HTTP API server for ScentVault

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scentvault_api::{build_router, AppState, CatalogBackend, ServerConfig};
use scentvault_chat::{AssistantConfig, PerfumeAssistant};
use scentvault_core::CatalogRepository;
use scentvault_db::{
    load_seed_file, log_pool_metrics, seed_if_empty, Database, InMemoryCatalogRepository,
    PoolConfig,
};
use scentvault_inference::backend_from_env;

/// Initialize tracing.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables daily-rotated file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: "scentvault_api=debug,tower_http=debug")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "scentvault_api=debug,scentvault_chat=debug,scentvault_inference=info,tower_http=debug"
            .into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("scentvault-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}

async fn open_catalog(config: &ServerConfig) -> anyhow::Result<Arc<dyn CatalogRepository>> {
    let catalog: Arc<dyn CatalogRepository> = match config.catalog_backend {
        CatalogBackend::Postgres => {
            info!("Connecting to database...");
            let db = Database::connect_with_config(&config.database_url, PoolConfig::from_env())
                .await?;
            info!("Running database migrations...");
            db.migrate().await?;
            log_pool_metrics(db.pool());
            info!("Database ready");
            Arc::new(db.catalog)
        }
        CatalogBackend::Memory => {
            warn!("Using in-memory catalog; changes are lost on restart");
            Arc::new(InMemoryCatalogRepository::new())
        }
    };

    if let Some(ref path) = config.seed_catalog {
        let inputs = load_seed_file(path).await?;
        let added = seed_if_empty(catalog.as_ref(), inputs).await?;
        info!(added, path = %path.display(), "Catalog seed processed");
    }

    Ok(catalog)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let config = ServerConfig::from_env()?;
    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if config.rate_limit_enabled {
            "enabled"
        } else {
            "disabled"
        },
        config.rate_limit_requests,
        config.rate_limit_period_secs
    );

    let catalog = open_catalog(&config).await?;

    let backend = backend_from_env()?;
    if backend.health_check().await? {
        info!(model = backend.model_name(), "Chat backend reachable");
    } else {
        warn!(model = backend.model_name(), "Chat backend not reachable; assistant replies will degrade");
    }

    let assistant = PerfumeAssistant::new(catalog.clone(), backend.clone(), AssistantConfig::from_env());
    let state = AppState::new(catalog, backend, assistant).with_rate_limit(&config)?;
    let app = build_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
