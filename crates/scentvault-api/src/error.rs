//! Mapping of domain errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// The generation backend failed or returned nothing usable.
    BadGateway(String),
    GatewayTimeout(String),
    Internal(scentvault_core::Error),
}

impl From<scentvault_core::Error> for ApiError {
    fn from(err: scentvault_core::Error) -> Self {
        use scentvault_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::PerfumeNotFound(id) => ApiError::NotFound(format!("Perfume not found: {}", id)),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Inference(msg) => ApiError::BadGateway(msg),
            Error::Timeout(msg) => ApiError::GatewayTimeout(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => {
                tracing::warn!(error = %msg, "Generation failed");
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::GatewayTimeout(msg) => {
                tracing::warn!(error = %msg, "Generation timed out");
                (StatusCode::GATEWAY_TIMEOUT, msg)
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
