//! Dashboard and per-platform performance reports.
//!
//! Both reports are pure functions over campaign and metric rows loaded from the
//! store. Every ratio guards its denominator (a zero denominator yields 0) and is
//! rounded to two decimal places.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{campaign, metric, CampaignStatus, Platform};

/// Value credited to a single conversion when computing ROI
const CONVERSION_VALUE: f64 = 100.0;

/// Aggregate figures across every campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_campaigns: u64,
    pub active_campaigns: u64,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub total_engagements: i64,
    pub total_conversions: i64,
    pub total_spend: f64,
    /// Clicks per impression, in percent
    pub avg_ctr: f64,
    /// Engagements per impression, in percent
    pub avg_engagement_rate: f64,
    /// Conversions per click, in percent
    pub conversion_rate: f64,
    /// Return on spend, in percent, valuing each conversion at 100
    pub roi: f64,
}

/// Aggregate figures for the campaigns of one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlatformPerformance {
    pub platform: Platform,
    pub campaigns_count: u64,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub total_engagements: i64,
    pub total_conversions: i64,
    pub total_spend: f64,
    pub ctr: f64,
    pub engagement_rate: f64,
    pub conversion_rate: f64,
    /// Spend per click
    pub cpc: f64,
}

/// Summed metric counters
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct MetricTotals {
    impressions: i64,
    clicks: i64,
    engagements: i64,
    conversions: i64,
    spend: Decimal,
}

impl MetricTotals {
    /// Sums saturate instead of overflowing
    fn add(&mut self, row: &metric::Model) {
        self.impressions = self.impressions.saturating_add(row.impressions);
        self.clicks = self.clicks.saturating_add(row.clicks);
        self.engagements = self.engagements.saturating_add(row.engagements);
        self.conversions = self.conversions.saturating_add(row.conversions);
        self.spend = self.spend.checked_add(row.spend).unwrap_or(Decimal::MAX);
    }

    fn spend(&self) -> f64 {
        self.spend.to_f64().unwrap_or(0.0)
    }

    fn ctr(&self) -> f64 {
        percentage(self.clicks as f64, self.impressions as f64)
    }

    fn engagement_rate(&self) -> f64 {
        percentage(self.engagements as f64, self.impressions as f64)
    }

    fn conversion_rate(&self) -> f64 {
        percentage(self.conversions as f64, self.clicks as f64)
    }

    fn roi(&self) -> f64 {
        let spend = self.spend();
        percentage(self.conversions as f64 * CONVERSION_VALUE - spend, spend)
    }

    fn cpc(&self) -> f64 {
        ratio(self.spend(), self.clicks as f64)
    }
}

impl<'a> FromIterator<&'a metric::Model> for MetricTotals {
    fn from_iter<I: IntoIterator<Item = &'a metric::Model>>(rows: I) -> Self {
        let mut totals = MetricTotals::default();
        for row in rows {
            totals.add(row);
        }
        totals
    }
}

/// Rounds to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn percentage(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

pub fn dashboard_stats(campaigns: &[campaign::Model], metrics: &[metric::Model]) -> DashboardStats {
    let totals: MetricTotals = metrics.iter().collect();
    let active_campaigns = campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active)
        .count() as u64;

    DashboardStats {
        total_campaigns: campaigns.len() as u64,
        active_campaigns,
        total_impressions: totals.impressions,
        total_clicks: totals.clicks,
        total_engagements: totals.engagements,
        total_conversions: totals.conversions,
        total_spend: totals.spend(),
        avg_ctr: round2(totals.ctr()),
        avg_engagement_rate: round2(totals.engagement_rate()),
        conversion_rate: round2(totals.conversion_rate()),
        roi: round2(totals.roi()),
    }
}

/// One entry per platform that has at least one campaign, in platform declaration order.
/// Metrics whose campaign is not among `campaigns` are ignored.
pub fn platform_performance(
    campaigns: &[campaign::Model],
    metrics: &[metric::Model],
) -> Vec<PlatformPerformance> {
    let platform_of: HashMap<Uuid, Platform> = campaigns.iter().map(|c| (c.id, c.platform)).collect();

    let mut groups: BTreeMap<Platform, (u64, MetricTotals)> = BTreeMap::new();
    for campaign in campaigns {
        groups.entry(campaign.platform).or_default().0 += 1;
    }
    for row in metrics {
        if let Some(platform) = platform_of.get(&row.campaign_id) {
            if let Some((_, totals)) = groups.get_mut(platform) {
                totals.add(row);
            }
        }
    }

    groups
        .into_iter()
        .map(|(platform, (campaigns_count, totals))| PlatformPerformance {
            platform,
            campaigns_count,
            total_impressions: totals.impressions,
            total_clicks: totals.clicks,
            total_engagements: totals.engagements,
            total_conversions: totals.conversions,
            total_spend: totals.spend(),
            ctr: round2(totals.ctr()),
            engagement_rate: round2(totals.engagement_rate()),
            conversion_rate: round2(totals.conversion_rate()),
            cpc: round2(totals.cpc()),
        })
        .collect()
}
