use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use super::{AppJson, AppPath};
use crate::entities::metric;
use crate::error::AppError;
use crate::validation::{validate_metric, MetricInput};
use crate::AppState;

/// Daily metrics of one campaign, newest day first
#[utoipa::path(
    get,
    path = "/api/campaigns/{id}/metrics",
    tag = "Metrics",
    params(("id" = Uuid, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "Metric rows", body = [metric::Model]),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_metrics(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<metric::Model>>, AppError> {
    state.repo.find(id).await?;
    Ok(Json(state.repo.metrics_for(id).await?))
}

/// Record one day of figures for a campaign
#[utoipa::path(
    post,
    path = "/api/campaigns/{id}/metrics",
    tag = "Metrics",
    params(("id" = Uuid, Path, description = "Campaign id")),
    request_body = MetricInput,
    responses(
        (status = 201, description = "Metric recorded", body = metric::Model),
        (status = 400, description = "Validation failed or day already recorded"),
        (status = 404, description = "No such campaign")
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn create_metric(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<MetricInput>,
) -> Result<(StatusCode, Json<metric::Model>), AppError> {
    let fields = validate_metric(input)?;
    let row = state.repo.create_metric(id, fields).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
