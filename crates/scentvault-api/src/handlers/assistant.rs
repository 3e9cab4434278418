//! Assistant endpoints: chat, mixer and recommender.

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use scentvault_core::{ChatReply, ChatTurn, MixRecipe, Recommendations};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    pub query: String,
    /// Text content of an attached file.
    #[serde(default)]
    pub file_content: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PublicChatBody {
    pub query: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MixBody {
    pub preference: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendBody {
    pub query: String,
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

/// Admin assistant turn.
///
/// POST /api/v1/chat
#[utoipa::path(post, path = "/api/v1/chat", tag = "Assistant",
    request_body = ChatBody,
    responses((status = 200, body = ChatReply), (status = 400, description = "Empty query")))]
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, ApiError> {
    let query = required("query", &body.query)?;
    let file_content = body.file_content.as_deref().filter(|c| !c.trim().is_empty());
    Ok(Json(
        state.assistant.chat(query, file_content, &body.history).await,
    ))
}

/// Public catalog assistant turn.
///
/// POST /api/v1/chat/public
#[utoipa::path(post, path = "/api/v1/chat/public", tag = "Assistant",
    request_body = PublicChatBody,
    responses((status = 200, body = ChatReply), (status = 400, description = "Empty query")))]
pub async fn public_chat(
    State(state): State<AppState>,
    Json(body): Json<PublicChatBody>,
) -> Result<Json<ChatReply>, ApiError> {
    let query = required("query", &body.query)?;
    Ok(Json(state.assistant.public_chat(query, &body.history).await))
}

/// Invent a blend from catalog perfumes.
///
/// POST /api/v1/mix
#[utoipa::path(post, path = "/api/v1/mix", tag = "Assistant",
    request_body = MixBody,
    responses((status = 200, body = MixRecipe), (status = 502, description = "Generation failed")))]
pub async fn mix(
    State(state): State<AppState>,
    Json(body): Json<MixBody>,
) -> Result<Json<MixRecipe>, ApiError> {
    let preference = required("preference", &body.preference)?;
    Ok(Json(state.assistant.mix_perfume(preference).await?))
}

/// Recommend catalog perfumes for a request.
///
/// POST /api/v1/recommend
#[utoipa::path(post, path = "/api/v1/recommend", tag = "Assistant",
    request_body = RecommendBody,
    responses((status = 200, body = Recommendations)))]
pub async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendBody>,
) -> Result<Json<Recommendations>, ApiError> {
    let query = required("query", &body.query)?;
    Ok(Json(state.assistant.recommend_perfume(query).await))
}
