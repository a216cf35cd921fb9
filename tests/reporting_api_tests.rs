mod common;

use axum::http::StatusCode;
use campaign_analytics::sample_data;
use common::{create_campaign, get, post, test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn dashboard_stats_on_empty_store_are_zero() {
    let (app, _) = test_app().await;
    let (status, stats) = get(&app, "/api/campaigns/dashboard_stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_campaigns"], 0);
    assert_eq!(stats["total_impressions"], 0);
    assert_eq!(stats["avg_ctr"], 0.0);
    assert_eq!(stats["avg_engagement_rate"], 0.0);
    assert_eq!(stats["conversion_rate"], 0.0);
    assert_eq!(stats["roi"], 0.0);
}

#[tokio::test]
async fn dashboard_stats_over_sample_data() {
    let (app, state) = test_app().await;
    assert!(sample_data::load(&state.repo).await.unwrap());
    // Loading twice is a no-op
    assert!(!sample_data::load(&state.repo).await.unwrap());

    let (status, stats) = get(&app, "/api/campaigns/dashboard_stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_campaigns"], 4);
    assert_eq!(stats["active_campaigns"], 4);
    assert_eq!(stats["total_impressions"], 111000);
    assert_eq!(stats["total_clicks"], 3330);
    assert_eq!(stats["total_engagements"], 2270);
    assert_eq!(stats["total_conversions"], 305);
    assert_eq!(stats["total_spend"], 1720.0);
    assert_eq!(stats["avg_ctr"], 3.0);
    assert_eq!(stats["avg_engagement_rate"], 2.05);
    assert_eq!(stats["conversion_rate"], 9.16);
    assert_eq!(stats["roi"], 1673.26);
}

#[tokio::test]
async fn active_count_follows_pause() {
    let (app, state) = test_app().await;
    sample_data::load(&state.repo).await.unwrap();

    let (_, active) = get(&app, "/api/campaigns/active").await;
    let first = active[0]["id"].as_str().unwrap().to_string();
    post(&app, &format!("/api/campaigns/{}/pause", first), json!({})).await;

    let (_, stats) = get(&app, "/api/campaigns/dashboard_stats").await;
    assert_eq!(stats["total_campaigns"], 4);
    assert_eq!(stats["active_campaigns"], 3);
}

#[tokio::test]
async fn platform_performance_over_sample_data() {
    let (app, state) = test_app().await;
    sample_data::load(&state.repo).await.unwrap();

    let (status, body) = get(&app, "/api/campaigns/platform_performance").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    let platforms: Vec<&str> = rows.iter().map(|r| r["platform"].as_str().unwrap()).collect();
    assert_eq!(platforms, vec!["facebook", "instagram", "twitter", "linkedin"]);

    let by_platform = |name: &str| -> &Value { rows.iter().find(|r| r["platform"] == name).unwrap() };

    let instagram = by_platform("instagram");
    assert_eq!(instagram["campaigns_count"], 1);
    assert_eq!(instagram["total_impressions"], 55000);
    assert_eq!(instagram["total_clicks"], 1650);
    assert_eq!(instagram["ctr"], 3.0);
    assert_eq!(instagram["engagement_rate"], 2.09);
    assert_eq!(instagram["conversion_rate"], 10.0);
    assert_eq!(instagram["cpc"], 0.52);

    let facebook = by_platform("facebook");
    assert_eq!(facebook["total_impressions"], 26000);
    assert_eq!(facebook["cpc"], 0.54);
}

#[tokio::test]
async fn platform_without_metrics_reports_zero_rates() {
    let (app, _) = test_app().await;
    create_campaign(
        &app,
        json!({ "name": "Quiet", "platform": "tiktok", "start_date": "2024-01-01" }),
    )
    .await;

    let (_, body) = get(&app, "/api/campaigns/platform_performance").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["platform"], "tiktok");
    assert_eq!(body[0]["campaigns_count"], 1);
    assert_eq!(body[0]["ctr"], 0.0);
    assert_eq!(body[0]["cpc"], 0.0);
}
