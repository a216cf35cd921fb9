use std::time::Duration;

use anyhow::{Context, Result};

use crate::trending::DEFAULT_FEED_URL;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./campaigns.sqlite?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Per-IP request throttling
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimit {
    pub burst: u32,
    /// Time to replenish one request
    pub period: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub trending_feed_url: String,
    pub trending_timeout: Duration,
    pub trending_limit: usize,
    pub page_size: u64,
    pub rate_limit: Option<RateLimit>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            trending_feed_url: DEFAULT_FEED_URL.to_string(),
            trending_timeout: Duration::from_secs(10),
            trending_limit: 10,
            page_size: 10,
            rate_limit: None,
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment. Call `dotenvy::dotenv()` first
    /// if a `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let rate_limit = match parse::<u32>(&lookup, "RATE_LIMIT_BURST")? {
            Some(0) => anyhow::bail!("RATE_LIMIT_BURST must be greater than zero"),
            Some(burst) => {
                let secs = parse::<u64>(&lookup, "RATE_LIMIT_PERIOD_SECS")?.unwrap_or(60);
                Some(RateLimit { burst, period: Duration::from_secs(secs.max(1)) })
            }
            None => None,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            trending_feed_url: lookup("TRENDING_FEED_URL").unwrap_or(defaults.trending_feed_url),
            trending_timeout: parse::<u64>(&lookup, "TRENDING_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.trending_timeout),
            trending_limit: parse(&lookup, "TRENDING_LIMIT")?.unwrap_or(defaults.trending_limit),
            page_size: parse(&lookup, "PAGE_SIZE")?.unwrap_or(defaults.page_size),
            rate_limit,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.trending_timeout, Duration::from_secs(10));
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PAGE_SIZE", "25"),
            ("TRENDING_LIMIT", "5"),
            ("TRENDING_TIMEOUT_SECS", "3"),
            ("RATE_LIMIT_BURST", "20"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.trending_limit, 5);
        assert_eq!(config.trending_timeout, Duration::from_secs(3));
        assert_eq!(
            config.rate_limit,
            Some(RateLimit { burst: 20, period: Duration::from_secs(60) })
        );
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = config_from(&[("PAGE_SIZE", "ten")]).unwrap_err();
        assert!(err.to_string().contains("PAGE_SIZE"));

        assert!(config_from(&[("RATE_LIMIT_BURST", "0")]).is_err());
    }
}
