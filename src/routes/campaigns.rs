use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{AppJson, AppPath, AppQuery};
use crate::entities::{campaign, metric};
use crate::error::AppError;
use crate::lifecycle;
use crate::reporting::{self, DashboardStats, PlatformPerformance};
use crate::repository::CampaignQuery;
use crate::validation::{validate_campaign, validate_replacement, CampaignInput};
use crate::AppState;

/// A campaign together with its daily metrics, newest first
#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignResponse {
    #[serde(flatten)]
    pub campaign: campaign::Model,
    pub metrics: Vec<metric::Model>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignListResponse {
    /// Number of campaigns matching the query
    pub count: u64,
    /// Next page number, if any
    pub next: Option<u64>,
    /// Previous page number, if any
    pub previous: Option<u64>,
    pub results: Vec<CampaignResponse>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Terms matched against name, platform and status
    pub search: Option<String>,
    /// Comma-separated fields among created_at, name, status; prefix `-` for descending
    pub ordering: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default from configuration, at most 100)
    pub page_size: Option<u64>,
}

async fn with_metrics(state: &AppState, campaign: campaign::Model) -> Result<CampaignResponse, AppError> {
    let metrics = state.repo.metrics_for(campaign.id).await?;
    Ok(CampaignResponse { campaign, metrics })
}

/// List campaigns with search, ordering and pagination
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campaigns",
    params(ListParams),
    responses(
        (status = 200, description = "One page of campaigns", body = CampaignListResponse),
        (status = 400, description = "Malformed query parameters"),
        (status = 404, description = "Page out of range")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_campaigns(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<CampaignListResponse>, AppError> {
    let query = CampaignQuery {
        search: params.search,
        ordering: params.ordering,
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(state.config.page_size),
    };
    let page = state.repo.list(&query).await?;

    let ids: Vec<Uuid> = page.campaigns.iter().map(|c| c.id).collect();
    let mut metrics = state.repo.metrics_by_campaign(&ids).await?;
    let results = page
        .campaigns
        .into_iter()
        .map(|campaign| CampaignResponse {
            metrics: metrics.remove(&campaign.id).unwrap_or_default(),
            campaign,
        })
        .collect();

    Ok(Json(CampaignListResponse {
        count: page.count,
        next: (page.page < page.num_pages).then_some(page.page + 1),
        previous: (page.page > 1).then_some(page.page - 1),
        results,
    }))
}

/// Create a campaign
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "Campaigns",
    request_body = CampaignInput,
    responses(
        (status = 201, description = "Campaign created", body = CampaignResponse),
        (status = 400, description = "Validation failed")
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn create_campaign(
    State(state): State<AppState>,
    AppJson(input): AppJson<CampaignInput>,
) -> Result<(StatusCode, Json<CampaignResponse>), AppError> {
    let fields = validate_campaign(input)?;
    let campaign = state.repo.create(fields).await?;
    Ok((StatusCode::CREATED, Json(CampaignResponse { campaign, metrics: Vec::new() })))
}

/// Retrieve one campaign
#[utoipa::path(
    get,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "The campaign", body = CampaignResponse),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CampaignResponse>, AppError> {
    let campaign = state.repo.find(id).await?;
    Ok(Json(with_metrics(&state, campaign).await?))
}

/// Replace a campaign; name, platform and start date are required, other omitted fields are kept
#[utoipa::path(
    put,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    request_body = CampaignInput,
    responses(
        (status = 200, description = "Campaign updated", body = CampaignResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn update_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<CampaignInput>,
) -> Result<Json<CampaignResponse>, AppError> {
    let existing = state.repo.find(id).await?;
    let fields = validate_replacement(input, &existing)?;
    let campaign = state.repo.update(id, fields).await?;
    Ok(Json(with_metrics(&state, campaign).await?))
}

/// Update only the fields present in the body
#[utoipa::path(
    patch,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    request_body = CampaignInput,
    responses(
        (status = 200, description = "Campaign updated", body = CampaignResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state, patch))]
pub async fn patch_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<CampaignInput>,
) -> Result<Json<CampaignResponse>, AppError> {
    let existing = state.repo.find(id).await?;
    let fields = validate_campaign(patch.merged_onto(&existing))?;
    let campaign = state.repo.update(id, fields).await?;
    Ok(Json(with_metrics(&state, campaign).await?))
}

/// Delete a campaign and its metrics
#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    responses(
        (status = 204, description = "Campaign deleted"),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Campaigns whose status is active, newest first
#[utoipa::path(
    get,
    path = "/api/campaigns/active",
    tag = "Campaigns",
    responses((status = 200, description = "Active campaigns", body = [CampaignResponse]))
)]
#[tracing::instrument(skip(state))]
pub async fn active_campaigns(State(state): State<AppState>) -> Result<Json<Vec<CampaignResponse>>, AppError> {
    let campaigns = lifecycle::list_active(&state.repo).await?;
    let ids: Vec<Uuid> = campaigns.iter().map(|c| c.id).collect();
    let mut metrics = state.repo.metrics_by_campaign(&ids).await?;

    Ok(Json(
        campaigns
            .into_iter()
            .map(|campaign| CampaignResponse {
                metrics: metrics.remove(&campaign.id).unwrap_or_default(),
                campaign,
            })
            .collect(),
    ))
}

/// Pause a campaign
#[utoipa::path(
    post,
    path = "/api/campaigns/{id}/pause",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "Campaign paused", body = CampaignResponse),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn pause_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CampaignResponse>, AppError> {
    let campaign = lifecycle::pause(&state.repo, id).await?;
    Ok(Json(with_metrics(&state, campaign).await?))
}

/// Resume a campaign
#[utoipa::path(
    post,
    path = "/api/campaigns/{id}/resume",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "Campaign active again", body = CampaignResponse),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn resume_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CampaignResponse>, AppError> {
    let campaign = lifecycle::resume(&state.repo, id).await?;
    Ok(Json(with_metrics(&state, campaign).await?))
}

/// Copy a campaign under a new id; metrics are not copied
#[utoipa::path(
    post,
    path = "/api/campaigns/{id}/duplicate",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "Campaign to copy")),
    responses(
        (status = 201, description = "Copy created", body = CampaignResponse),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn duplicate_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<(StatusCode, Json<CampaignResponse>), AppError> {
    let campaign = lifecycle::duplicate(&state.repo, id).await?;
    Ok((StatusCode::CREATED, Json(CampaignResponse { campaign, metrics: Vec::new() })))
}

/// Totals and derived rates over every campaign and metric
#[utoipa::path(
    get,
    path = "/api/campaigns/dashboard_stats",
    tag = "Reports",
    responses((status = 200, description = "Dashboard statistics", body = DashboardStats))
)]
#[tracing::instrument(skip(state))]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let campaigns = state.repo.all_campaigns().await?;
    let metrics = state.repo.all_metrics().await?;
    Ok(Json(reporting::dashboard_stats(&campaigns, &metrics)))
}

/// Per-platform totals for platforms that have campaigns
#[utoipa::path(
    get,
    path = "/api/campaigns/platform_performance",
    tag = "Reports",
    responses((status = 200, description = "One entry per platform", body = [PlatformPerformance]))
)]
#[tracing::instrument(skip(state))]
pub async fn platform_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlatformPerformance>>, AppError> {
    let campaigns = state.repo.all_campaigns().await?;
    let metrics = state.repo.all_metrics().await?;
    Ok(Json(reporting::platform_performance(&campaigns, &metrics)))
}
