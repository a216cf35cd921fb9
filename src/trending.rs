//! Adapter over an external ranked feed of popular posts.
//!
//! The feed is expected in the reddit listing shape
//! (`data.children[].data.{title, ups, num_comments, subreddit, url}`);
//! missing or mistyped fields fall back to empty values.

use std::time::Duration;

use reqwest::{header::USER_AGENT, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::error::AppError;

pub const DEFAULT_FEED_URL: &str = "https://www.reddit.com/r/popular/hot.json";

// Public feeds reject requests without a browser-like agent
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendingTopic {
    /// Post title
    pub topic: String,
    /// Upvote count
    pub mentions: i64,
    /// Number of comments
    pub comments: i64,
    /// Source community
    pub subreddit: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendingTopicsResponse {
    /// "success" or "error"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub trending_topics: Vec<TrendingTopic>,
    pub total_topics: usize,
}

impl TrendingTopicsResponse {
    pub fn success(topics: Vec<TrendingTopic>) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            total_topics: topics.len(),
            trending_topics: topics,
        }
    }

    pub fn failure(cause: impl std::fmt::Display) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(format!("Failed to fetch trending topics: {}", cause)),
            trending_topics: Vec::new(),
            total_topics: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrendingClient {
    client: Client,
    feed_url: String,
    limit: usize,
    timeout: Duration,
}

impl TrendingClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            feed_url: config.trending_feed_url.clone(),
            limit: config.trending_limit,
            timeout: config.trending_timeout,
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// One request, no retries.
    #[tracing::instrument(skip(self), fields(feed = %self.feed_url))]
    pub async fn fetch(&self) -> Result<Vec<TrendingTopic>, AppError> {
        let response = self
            .client
            .get(&self.feed_url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let topics = parse_topics(&body, self.limit);
        tracing::info!("Fetched {} trending topics", topics.len());
        Ok(topics)
    }
}

/// Extracts up to `limit` topics from a listing document.
pub fn parse_topics(body: &Value, limit: usize) -> Vec<TrendingTopic> {
    let Some(children) = body.pointer("/data/children").and_then(Value::as_array) else {
        return Vec::new();
    };

    children
        .iter()
        .take(limit)
        .map(|child| {
            let post = child.get("data").unwrap_or(&Value::Null);
            let text = |key: &str| post.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
            let number = |key: &str| post.get(key).and_then(Value::as_i64).unwrap_or(0);

            TrendingTopic {
                topic: text("title"),
                mentions: number("ups"),
                comments: number("num_comments"),
                subreddit: text("subreddit"),
                url: text("url"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_listing_fields() {
        let body = json!({
            "data": { "children": [
                { "data": {
                    "title": "Rust 2.0 announced",
                    "ups": 5123,
                    "num_comments": 812,
                    "subreddit": "programming",
                    "url": "https://example.com/rust"
                }},
                { "data": { "title": "Cats", "ups": 77 } }
            ]}
        });

        let topics = parse_topics(&body, 10);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic, "Rust 2.0 announced");
        assert_eq!(topics[0].mentions, 5123);
        assert_eq!(topics[0].comments, 812);
        assert_eq!(topics[0].subreddit, "programming");
        assert_eq!(topics[1].comments, 0);
        assert_eq!(topics[1].url, "");
    }

    #[test]
    fn mentions_come_from_upvotes() {
        let body = json!({ "data": { "children": [
            { "data": { "title": "t", "ups": 4321 } },
            { "data": { "title": "u", "score": 99 } }
        ]}});

        let topics = parse_topics(&body, 10);
        assert_eq!(topics[0].mentions, 4321);
        assert_eq!(topics[1].mentions, 0);
    }

    #[test]
    fn mistyped_fields_fall_back_to_empty() {
        let body = json!({ "data": { "children": [
            { "data": { "title": 12, "ups": "many", "subreddit": null } },
            { "kind": "t3" }
        ]}});

        let topics = parse_topics(&body, 10);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic, "");
        assert_eq!(topics[0].mentions, 0);
        assert_eq!(topics[1], TrendingTopic {
            topic: String::new(),
            mentions: 0,
            comments: 0,
            subreddit: String::new(),
            url: String::new(),
        });
    }

    #[test]
    fn honours_limit_and_odd_documents() {
        let children: Vec<Value> = (0..15).map(|i| json!({ "data": { "title": format!("t{}", i) } })).collect();
        let body = json!({ "data": { "children": children } });
        assert_eq!(parse_topics(&body, 10).len(), 10);

        assert!(parse_topics(&json!({ "error": 429 }), 10).is_empty());
        assert!(parse_topics(&json!([1, 2, 3]), 10).is_empty());
    }

    #[test]
    fn failure_payload_shape() {
        let payload = serde_json::to_value(TrendingTopicsResponse::failure("timed out")).unwrap();
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["message"], "Failed to fetch trending topics: timed out");
        assert_eq!(payload["total_topics"], 0);
        assert_eq!(payload["trending_topics"], json!([]));

        let ok = serde_json::to_value(TrendingTopicsResponse::success(vec![])).unwrap();
        assert!(ok.get("message").is_none());
    }
}
