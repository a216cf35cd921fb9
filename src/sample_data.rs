//! Demo dataset: four active campaigns with a few days of figures each.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::entities::{CampaignStatus, Platform};
use crate::error::AppError;
use crate::repository::CampaignRepository;
use crate::validation::{CampaignFields, MetricFields};

struct SampleCampaign {
    name: &'static str,
    platform: Platform,
    start: (i32, u32, u32),
    budget: i64,
    // (day of December 2024, impressions, clicks, engagements, conversions, spend)
    days: &'static [(u32, i64, i64, i64, i64, i64)],
}

const SAMPLES: &[SampleCampaign] = &[
    SampleCampaign {
        name: "Summer Sale 2024",
        platform: Platform::Instagram,
        start: (2024, 6, 1),
        budget: 5000,
        days: &[
            (8, 15000, 450, 320, 45, 250),
            (9, 18000, 520, 380, 52, 280),
            (10, 22000, 680, 450, 68, 320),
        ],
    },
    SampleCampaign {
        name: "Brand Awareness",
        platform: Platform::Facebook,
        start: (2024, 5, 15),
        budget: 3000,
        days: &[(8, 12000, 360, 240, 30, 200), (9, 14000, 420, 280, 35, 220)],
    },
    SampleCampaign {
        name: "Holiday Campaign",
        platform: Platform::Twitter,
        start: (2024, 12, 1),
        budget: 8000,
        days: &[(8, 20000, 600, 400, 50, 300)],
    },
    SampleCampaign {
        name: "Product Launch",
        platform: Platform::Linkedin,
        start: (2024, 11, 1),
        budget: 4500,
        days: &[(8, 10000, 300, 200, 25, 150)],
    },
];

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::Internal(format!("invalid sample date {}-{}-{}", year, month, day)))
}

/// Inserts the demo dataset unless campaigns already exist.
/// Returns whether anything was written.
pub async fn load(repo: &CampaignRepository) -> Result<bool, AppError> {
    let existing = repo.count_campaigns().await?;
    if existing > 0 {
        tracing::info!("{} campaigns already present; skipping sample data", existing);
        return Ok(false);
    }

    for sample in SAMPLES {
        let (year, month, day) = sample.start;
        let campaign = repo
            .create(CampaignFields {
                name: sample.name.to_string(),
                description: None,
                platform: sample.platform,
                status: CampaignStatus::Active,
                start_date: date(year, month, day)?,
                end_date: None,
                budget: Some(Decimal::new(sample.budget, 0)),
                impressions: 0,
                clicks: 0,
                conversions: 0,
                engagement_rate: 0.0,
            })
            .await?;

        for &(day, impressions, clicks, engagements, conversions, spend) in sample.days {
            repo.create_metric(
                campaign.id,
                MetricFields {
                    date: date(2024, 12, day)?,
                    impressions,
                    clicks,
                    engagements,
                    conversions,
                    spend: Decimal::new(spend, 0),
                },
            )
            .await?;
        }
    }

    tracing::info!("Sample data created: {} campaigns", SAMPLES.len());
    Ok(true)
}
