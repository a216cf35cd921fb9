use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use super::AppJson;
use crate::content_analysis::{self, ContentAnalysis};
use crate::error::AppError;
use crate::trending::TrendingTopicsResponse;
use crate::validation::ValidationErrors;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeContentRequest {
    /// Text to score
    pub content: Option<String>,
}

/// Top posts from the configured trending feed
#[utoipa::path(
    get,
    path = "/api/social-api/fetch_trending_topics",
    tag = "Social",
    responses(
        (status = 200, description = "Trending topics fetched", body = TrendingTopicsResponse),
        (status = 503, description = "Feed unreachable or unreadable", body = TrendingTopicsResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn fetch_trending_topics(State(state): State<AppState>) -> (StatusCode, Json<TrendingTopicsResponse>) {
    match state.trending.fetch().await {
        Ok(topics) => (StatusCode::OK, Json(TrendingTopicsResponse::success(topics))),
        Err(err) => {
            tracing::warn!("Trending feed {} failed: {}", state.trending.feed_url(), err);
            (StatusCode::SERVICE_UNAVAILABLE, Json(TrendingTopicsResponse::failure(err)))
        }
    }
}

/// Keyword sentiment and engagement scoring
#[utoipa::path(
    post,
    path = "/api/social-api/analyze_content",
    tag = "Social",
    request_body = AnalyzeContentRequest,
    responses(
        (status = 200, description = "Analysis of the submitted text", body = ContentAnalysis),
        (status = 400, description = "Content missing or blank")
    )
)]
#[tracing::instrument(skip(request))]
pub async fn analyze_content(
    AppJson(request): AppJson<AnalyzeContentRequest>,
) -> Result<Json<ContentAnalysis>, AppError> {
    let content = request
        .content
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ValidationErrors::single("content", "Content is required."))?;

    Ok(Json(content_analysis::analyze(&content)))
}
