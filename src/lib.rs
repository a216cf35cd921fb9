use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod content_analysis;
pub mod db;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod reporting;
pub mod repository;
pub mod routes;
pub mod sample_data;
pub mod trending;
pub mod validation;

use config::AppConfig;
use error::AppError;
use repository::CampaignRepository;
use trending::TrendingClient;

/// Shared handles, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub repo: CampaignRepository,
    pub trending: TrendingClient,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            repo: CampaignRepository::new(db),
            trending: TrendingClient::new(client, &config),
            config: Arc::new(config),
        })
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campaign Analytics API",
        version = "0.1.0",
        description = "Advertising campaign management and performance reporting"
    ),
    paths(
        health_check,
        routes::list_campaigns,
        routes::create_campaign,
        routes::get_campaign,
        routes::update_campaign,
        routes::patch_campaign,
        routes::delete_campaign,
        routes::active_campaigns,
        routes::pause_campaign,
        routes::resume_campaign,
        routes::duplicate_campaign,
        routes::dashboard_stats,
        routes::platform_performance,
        routes::list_metrics,
        routes::create_metric,
        routes::fetch_trending_topics,
        routes::analyze_content
    ),
    components(schemas(
        entities::campaign::Model,
        entities::metric::Model,
        entities::Platform,
        entities::CampaignStatus,
        validation::CampaignInput,
        validation::MetricInput,
        validation::ValidationErrors,
        routes::CampaignResponse,
        routes::CampaignListResponse,
        routes::AnalyzeContentRequest,
        reporting::DashboardStats,
        reporting::PlatformPerformance,
        trending::TrendingTopic,
        trending::TrendingTopicsResponse,
        content_analysis::ContentAnalysis,
        content_analysis::Sentiment
    )),
    tags(
        (name = "Campaigns", description = "Campaign CRUD and lifecycle"),
        (name = "Metrics", description = "Daily campaign figures"),
        (name = "Reports", description = "Aggregated performance"),
        (name = "Social", description = "Trending topics and content analysis")
    )
)]
pub struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let rate_limit = state.config.rate_limit.clone();

    let mut api_routes = Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes())
        .with_state(state);

    // Docs stay outside the limiter
    if let Some(limit) = rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(limit.period)
                .burst_size(limit.burst)
                .finish()
                .ok_or_else(|| AppError::Internal("invalid rate limit configuration".to_string()))?,
        );
        tracing::info!("Rate limiting enabled: burst {} per {:?}", limit.burst, limit.period);
        api_routes = api_routes.layer(GovernorLayer::new(governor_conf));
    }

    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let app = Router::new()
        .merge(api_routes)
        .merge(docs_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
