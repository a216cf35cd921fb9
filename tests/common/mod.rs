#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use campaign_analytics::{config::AppConfig, create_app, db, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Once;
use tower::ServiceExt;

// For initializing tracing once
static INIT: Once = Once::new();

fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        ..AppConfig::default()
    }
}

/// App state over a freshly migrated in-memory database
pub async fn test_state(config: AppConfig) -> AppState {
    setup();
    let conn = db::connect(&config).await.expect("in-memory database");
    AppState::new(conn, config).expect("app state")
}

pub async fn test_app() -> (Router, AppState) {
    test_app_with(test_config()).await
}

pub async fn test_app_with(config: AppConfig) -> (Router, AppState) {
    let state = test_state(config).await;
    let app = create_app(state.clone()).expect("router");
    (app, state)
}

/// Sends one request and returns the status with the decoded JSON body (Null when empty)
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Creates a campaign through the API and returns its JSON
pub async fn create_campaign(app: &Router, body: Value) -> Value {
    let (status, json) = post(app, "/api/campaigns", body).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
    json
}

/// Parses a decimal rendered either as a string or as a number
pub fn decimal(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.as_f64().unwrap(),
    }
}
