use axum::{
    extract::{FromRequest, FromRequestParts},
    routing::{get, post},
    Router,
};

use crate::error::AppError;
use crate::AppState;

pub mod campaigns;
pub mod metrics;
pub mod social;

pub use campaigns::*;
pub use metrics::*;
pub use social::*;

/// JSON body whose rejections render as `AppError`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Every resource route, to be nested under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/active", get(active_campaigns))
        .route("/campaigns/dashboard_stats", get(dashboard_stats))
        .route("/campaigns/platform_performance", get(platform_performance))
        .route(
            "/campaigns/{id}",
            get(get_campaign)
                .put(update_campaign)
                .patch(patch_campaign)
                .delete(delete_campaign),
        )
        .route("/campaigns/{id}/pause", post(pause_campaign))
        .route("/campaigns/{id}/resume", post(resume_campaign))
        .route("/campaigns/{id}/duplicate", post(duplicate_campaign))
        .route("/campaigns/{id}/metrics", get(list_metrics).post(create_metric))
        .route("/social-api/fetch_trending_topics", get(fetch_trending_topics))
        .route("/social-api/analyze_content", post(analyze_content))
}
