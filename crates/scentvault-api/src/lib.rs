//! scentvault-api - HTTP API server for ScentVault
//!
//! The router is built here so it can be exercised in tests; `main.rs` only
//! wires configuration, the catalog store and the chat backend together.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use scentvault_core::{
    defaults, ChatReply, ChatRole, ChatTurn, MixRecipe, Perfume, PerfumeInput, QualityTier,
    RecipeLine, Recommendations, TargetAudience,
};

pub use config::{CatalogBackend, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

use handlers::{assistant, perfumes, system};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "M Katalog Parfum API",
        description = "Perfume catalog with an AI assistant for search, blending and recommendations"
    ),
    paths(
        system::health_check,
        perfumes::list_perfumes,
        perfumes::get_perfume,
        perfumes::create_perfume,
        perfumes::update_perfume,
        perfumes::delete_perfume,
        assistant::chat,
        assistant::public_chat,
        assistant::mix,
        assistant::recommend,
    ),
    components(schemas(
        Perfume,
        PerfumeInput,
        TargetAudience,
        QualityTier,
        ChatRole,
        ChatTurn,
        ChatReply,
        MixRecipe,
        RecipeLine,
        Recommendations,
        assistant::ChatBody,
        assistant::PublicChatBody,
        assistant::MixBody,
        assistant::RecommendBody,
    )),
    tags(
        (name = "Perfumes", description = "Catalog browsing and admin management"),
        (name = "Assistant", description = "Chat, blending and recommendations"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with its middleware stack.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.cors_origins()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(defaults::CORS_MAX_AGE_SECS));

    Router::new()
        .route("/health", get(system::health_check))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Catalog
        .route(
            "/api/v1/perfumes",
            get(perfumes::list_perfumes).post(perfumes::create_perfume),
        )
        .route(
            "/api/v1/perfumes/:id",
            get(perfumes::get_perfume)
                .put(perfumes::update_perfume)
                .delete(perfumes::delete_perfume),
        )
        // Assistant
        .route("/api/v1/chat", post(assistant::chat))
        .route("/api/v1/chat/public", post(assistant::public_chat))
        .route("/api/v1/mix", post(assistant::mix))
        .route("/api/v1/recommend", post(assistant::recommend))
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            system::rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(config.max_body_size_bytes))
        .with_state(state)
}
