//! Catalog browsing and admin CRUD.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use scentvault_core::{Perfume, PerfumeInput};
use scentvault_search::filter_catalog;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListPerfumesParams {
    /// Free-text keyword filter.
    pub q: Option<String>,
}

/// List the catalog, optionally filtered by keywords.
///
/// GET /api/v1/perfumes
#[utoipa::path(get, path = "/api/v1/perfumes", tag = "Perfumes",
    params(ListPerfumesParams),
    responses((status = 200, description = "Catalog entries", body = [Perfume])))]
pub async fn list_perfumes(
    State(state): State<AppState>,
    Query(params): Query<ListPerfumesParams>,
) -> Result<Json<Vec<Perfume>>, ApiError> {
    let all = state.catalog.list_all().await?;

    let cap = state.assistant.config().search_limit;
    let perfumes = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => filter_catalog(q, &all, cap),
        _ => all,
    };
    Ok(Json(perfumes))
}

/// GET /api/v1/perfumes/:id
#[utoipa::path(get, path = "/api/v1/perfumes/{id}", tag = "Perfumes",
    params(("id" = String, Path, description = "Perfume id")),
    responses((status = 200, body = Perfume), (status = 404, description = "Not found")))]
pub async fn get_perfume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Perfume>, ApiError> {
    state
        .catalog
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Perfume not found: {}", id)))
}

/// Add a perfume.
///
/// POST /api/v1/perfumes
#[utoipa::path(post, path = "/api/v1/perfumes", tag = "Perfumes",
    request_body = PerfumeInput,
    responses((status = 201, description = "Created"), (status = 400, description = "Invalid input")))]
pub async fn create_perfume(
    State(state): State<AppState>,
    Json(input): Json<PerfumeInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    input.validate()?;
    let id = state.catalog.insert(input).await?;
    tracing::info!(perfume_id = %id, "Perfume created");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Replace every editable field of a perfume.
///
/// PUT /api/v1/perfumes/:id
#[utoipa::path(put, path = "/api/v1/perfumes/{id}", tag = "Perfumes",
    params(("id" = String, Path, description = "Perfume id")),
    request_body = PerfumeInput,
    responses((status = 204, description = "Updated"), (status = 404, description = "Not found")))]
pub async fn update_perfume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PerfumeInput>,
) -> Result<StatusCode, ApiError> {
    input.validate()?;
    state.catalog.update(&id, input).await?;
    tracing::info!(perfume_id = %id, "Perfume updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/perfumes/:id
#[utoipa::path(delete, path = "/api/v1/perfumes/{id}", tag = "Perfumes",
    params(("id" = String, Path, description = "Perfume id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete_perfume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete(&id).await?;
    tracing::info!(perfume_id = %id, "Perfume deleted");
    Ok(StatusCode::NO_CONTENT)
}
