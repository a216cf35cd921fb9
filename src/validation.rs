//! Input rules applied to campaign and metric writes before anything reaches the store.
//!
//! Every check collects into a [`ValidationErrors`] map (field name to messages) so a
//! single response can report all problems at once.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::entities::{campaign, CampaignStatus, Platform};

/// Key used for errors that concern more than one field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const REQUIRED: &str = "This field is required.";
pub const NAME_MAX_LEN: usize = 255;
/// Largest accepted counter, the positive 32-bit integer range
pub const COUNTER_MAX: i64 = i32::MAX as i64;

/// Field-level validation failures, keyed by field name
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a map holding a single message
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Appends every message of `other`
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }
}

/// Lets a PATCH body distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Campaign fields as received from a client. Used for create, full update and
/// partial update; which fields are required depends on the operation.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct CampaignInput {
    /// Campaign name (required, trimmed)
    pub name: Option<String>,
    /// Free-form description
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Platform the campaign runs on (required)
    pub platform: Option<Platform>,
    /// Lifecycle status (defaults to draft)
    pub status: Option<CampaignStatus>,
    /// First day of the campaign (required)
    pub start_date: Option<NaiveDate>,
    /// Last day of the campaign, not before start_date
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Option<NaiveDate>>,
    /// Non-negative budget, as a number or decimal string
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub budget: Option<Option<Decimal>>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
    pub engagement_rate: Option<f64>,
}

impl CampaignInput {
    /// Overlays this patch on a stored campaign, yielding a complete input
    /// that can go through [`validate_campaign`].
    pub fn merged_onto(self, existing: &campaign::Model) -> CampaignInput {
        CampaignInput {
            name: self.name.or_else(|| Some(existing.name.clone())),
            description: self.description.or_else(|| Some(existing.description.clone())),
            platform: self.platform.or(Some(existing.platform)),
            status: self.status.or(Some(existing.status)),
            start_date: self.start_date.or(Some(existing.start_date)),
            end_date: self.end_date.or(Some(existing.end_date)),
            budget: self.budget.or(Some(existing.budget)),
            impressions: self.impressions.or(Some(existing.impressions)),
            clicks: self.clicks.or(Some(existing.clicks)),
            conversions: self.conversions.or(Some(existing.conversions)),
            engagement_rate: self.engagement_rate.or(Some(existing.engagement_rate)),
        }
    }
}

/// A campaign that passed validation, ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignFields {
    pub name: String,
    pub description: Option<String>,
    pub platform: Platform,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Decimal>,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub engagement_rate: f64,
}

impl From<&campaign::Model> for CampaignFields {
    fn from(model: &campaign::Model) -> Self {
        CampaignFields {
            name: model.name.clone(),
            description: model.description.clone(),
            platform: model.platform,
            status: model.status,
            start_date: model.start_date,
            end_date: model.end_date,
            budget: model.budget,
            impressions: model.impressions,
            clicks: model.clicks,
            conversions: model.conversions,
            engagement_rate: model.engagement_rate,
        }
    }
}

/// Name must be present and not just whitespace; the trimmed value is kept.
pub fn validate_name(name: Option<&str>) -> Result<String, String> {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err("Campaign name is required and cannot be empty.".to_string());
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(format!("Ensure this field has no more than {} characters.", NAME_MAX_LEN));
    }
    Ok(trimmed.to_string())
}

pub fn validate_budget(budget: Option<Decimal>) -> Result<Option<Decimal>, String> {
    match budget {
        Some(value) if value < Decimal::ZERO => Err("Budget cannot be negative.".to_string()),
        other => Ok(other),
    }
}

/// Counters default to 0 and must fit a non-negative 32-bit integer.
pub fn validate_counter(value: Option<i64>) -> Result<i64, String> {
    match value.unwrap_or(0) {
        n if (0..=COUNTER_MAX).contains(&n) => Ok(n),
        _ => Err(format!("Ensure this value is between 0 and {}.", COUNTER_MAX)),
    }
}

fn counter(errors: &mut ValidationErrors, field: &str, value: Option<i64>) -> i64 {
    validate_counter(value).unwrap_or_else(|message| {
        errors.add(field, message);
        0
    })
}

/// Cross-field rule: an end date may not precede the start date.
pub fn validate_dates(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Result<(), String> {
    match (start_date, end_date) {
        (Some(start), Some(end)) if end < start => Err("End date must be after start date.".to_string()),
        _ => Ok(()),
    }
}

/// Runs the whole campaign pipeline: required fields, field rules, then cross-field rules.
pub fn validate_campaign(input: CampaignInput) -> Result<CampaignFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = match validate_name(input.name.as_deref()) {
        Ok(name) => Some(name),
        Err(message) => {
            errors.add("name", message);
            None
        }
    };

    if input.platform.is_none() {
        errors.add("platform", REQUIRED);
    }
    if input.start_date.is_none() {
        errors.add("start_date", REQUIRED);
    }

    let budget = match validate_budget(input.budget.flatten()) {
        Ok(budget) => budget,
        Err(message) => {
            errors.add("budget", message);
            None
        }
    };

    let impressions = counter(&mut errors, "impressions", input.impressions);
    let clicks = counter(&mut errors, "clicks", input.clicks);
    let conversions = counter(&mut errors, "conversions", input.conversions);

    let end_date = input.end_date.flatten();
    if let Err(message) = validate_dates(input.start_date, end_date) {
        errors.add(NON_FIELD_ERRORS, message);
    }

    match (name, input.platform, input.start_date) {
        (Some(name), Some(platform), Some(start_date)) if errors.is_empty() => Ok(CampaignFields {
            name,
            description: input.description.flatten(),
            platform,
            status: input.status.unwrap_or_default(),
            start_date,
            end_date,
            budget,
            impressions,
            clicks,
            conversions,
            engagement_rate: input.engagement_rate.unwrap_or(0.0),
        }),
        _ => Err(errors),
    }
}

/// Full update of a stored campaign. Name, platform and start date must be sent;
/// any other field left out of the body keeps its stored value.
pub fn validate_replacement(
    input: CampaignInput,
    existing: &campaign::Model,
) -> Result<CampaignFields, ValidationErrors> {
    let mut missing = ValidationErrors::new();
    if input.name.is_none() {
        missing.add("name", REQUIRED);
    }
    if input.platform.is_none() {
        missing.add("platform", REQUIRED);
    }
    if input.start_date.is_none() {
        missing.add("start_date", REQUIRED);
    }

    match validate_campaign(input.merged_onto(existing)) {
        Ok(fields) if missing.is_empty() => Ok(fields),
        Ok(_) => Err(missing),
        Err(mut errors) => {
            errors.merge(missing);
            Err(errors)
        }
    }
}

/// Daily metric row as received from a client
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct MetricInput {
    /// Day the figures belong to (required)
    pub date: Option<NaiveDate>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub engagements: Option<i64>,
    pub conversions: Option<i64>,
    /// Non-negative spend, as a number or decimal string
    #[schema(value_type = Option<String>)]
    pub spend: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricFields {
    pub date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub engagements: i64,
    pub conversions: i64,
    pub spend: Decimal,
}

pub fn validate_metric(input: MetricInput) -> Result<MetricFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.date.is_none() {
        errors.add("date", REQUIRED);
    }
    let spend = input.spend.unwrap_or(Decimal::ZERO);
    if spend < Decimal::ZERO {
        errors.add("spend", "Spend cannot be negative.");
    }
    let impressions = counter(&mut errors, "impressions", input.impressions);
    let clicks = counter(&mut errors, "clicks", input.clicks);
    let engagements = counter(&mut errors, "engagements", input.engagements);
    let conversions = counter(&mut errors, "conversions", input.conversions);

    match input.date {
        Some(date) if errors.is_empty() => Ok(MetricFields {
            date,
            impressions,
            clicks,
            engagements,
            conversions,
            spend,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_input() -> CampaignInput {
        serde_json::from_value(json!({
            "name": "  Summer Sale 2024  ",
            "platform": "instagram",
            "start_date": "2024-06-01",
            "budget": 5000
        }))
        .unwrap()
    }

    #[test]
    fn name_is_trimmed() {
        assert_eq!(validate_name(Some("  Launch ")).unwrap(), "Launch");
    }

    #[test]
    fn blank_or_missing_name_is_rejected() {
        assert!(validate_name(Some("   ")).is_err());
        assert!(validate_name(Some("")).is_err());
        assert!(validate_name(None).is_err());
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "x".repeat(256);
        assert!(validate_name(Some(&name)).is_err());
        assert!(validate_name(Some(&name[..255])).is_ok());
    }

    #[test]
    fn negative_budget_is_rejected() {
        assert!(validate_budget(Some(Decimal::new(-1, 2))).is_err());
        assert_eq!(validate_budget(Some(Decimal::ZERO)).unwrap(), Some(Decimal::ZERO));
        assert_eq!(validate_budget(None).unwrap(), None);
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert!(validate_dates(Some(date(2024, 12, 15)), Some(date(2024, 12, 1))).is_err());
        assert!(validate_dates(Some(date(2024, 12, 15)), Some(date(2024, 12, 15))).is_ok());
        assert!(validate_dates(Some(date(2024, 12, 15)), None).is_ok());
    }

    #[test]
    fn valid_campaign_gets_defaults() {
        let fields = validate_campaign(valid_input()).unwrap();
        assert_eq!(fields.name, "Summer Sale 2024");
        assert_eq!(fields.status, CampaignStatus::Draft);
        assert_eq!(fields.budget, Some(Decimal::new(5000, 0)));
        assert_eq!(fields.impressions, 0);
        assert_eq!(fields.engagement_rate, 0.0);
    }

    #[test]
    fn all_failures_are_collected() {
        let input: CampaignInput = serde_json::from_value(json!({
            "name": " ",
            "start_date": "2024-12-15",
            "end_date": "2024-12-01",
            "budget": "-10.00"
        }))
        .unwrap();

        let errors = validate_campaign(input).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["budget", "name", NON_FIELD_ERRORS, "platform"]);
        assert_eq!(
            errors.field(NON_FIELD_ERRORS).unwrap(),
            ["End date must be after start date.".to_string()]
        );
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: CampaignInput = serde_json::from_value(json!({ "end_date": null })).unwrap();
        assert_eq!(patch.end_date, Some(None));
        assert_eq!(patch.budget, None);
    }

    fn stored() -> campaign::Model {
        let now = chrono::Utc::now();
        campaign::Model {
            id: uuid::Uuid::new_v4(),
            name: "Summer Sale 2024".to_string(),
            description: Some("Seasonal push".to_string()),
            platform: Platform::Instagram,
            status: CampaignStatus::Active,
            start_date: date(2024, 6, 1),
            end_date: Some(date(2024, 8, 31)),
            budget: Some(Decimal::new(5000, 0)),
            impressions: 500,
            clicks: 20,
            conversions: 2,
            engagement_rate: 3.5,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn replacement_keeps_absent_optional_fields() {
        let input: CampaignInput = serde_json::from_value(json!({
            "name": "Renamed",
            "platform": "tiktok",
            "start_date": "2024-07-01",
            "description": null
        }))
        .unwrap();

        let fields = validate_replacement(input, &stored()).unwrap();
        assert_eq!(fields.name, "Renamed");
        assert_eq!(fields.platform, Platform::Tiktok);
        assert_eq!(fields.description, None);
        assert_eq!(fields.status, CampaignStatus::Active);
        assert_eq!(fields.budget, Some(Decimal::new(5000, 0)));
        assert_eq!(fields.end_date, Some(date(2024, 8, 31)));
        assert_eq!(fields.impressions, 500);
        assert_eq!(fields.engagement_rate, 3.5);
    }

    #[test]
    fn replacement_still_requires_core_fields() {
        let input: CampaignInput = serde_json::from_value(json!({ "budget": -1 })).unwrap();
        let errors = validate_replacement(input, &stored()).unwrap_err();

        assert_eq!(errors.field("name"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.field("platform").is_some());
        assert!(errors.field("start_date").is_some());
        assert!(errors.field("budget").is_some());
    }

    #[test]
    fn counters_must_fit_storage() {
        assert_eq!(validate_counter(None), Ok(0));
        assert_eq!(validate_counter(Some(COUNTER_MAX)), Ok(COUNTER_MAX));
        assert!(validate_counter(Some(COUNTER_MAX + 1)).is_err());
        assert!(validate_counter(Some(-1)).is_err());

        let mut input = valid_input();
        input.clicks = Some(i64::MAX);
        let errors = validate_campaign(input).unwrap_err();
        assert_eq!(
            errors.field("clicks"),
            Some(&["Ensure this value is between 0 and 2147483647.".to_string()][..])
        );

        let errors = validate_metric(MetricInput {
            date: Some(date(2024, 12, 8)),
            impressions: Some(3_000_000_000),
            engagements: Some(-4),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.field("impressions").is_some());
        assert!(errors.field("engagements").is_some());
    }

    #[test]
    fn metric_requires_date_and_non_negative_spend() {
        let errors = validate_metric(MetricInput {
            spend: Some(Decimal::new(-500, 2)),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.field("date").is_some());
        assert!(errors.field("spend").is_some());

        let fields = validate_metric(MetricInput {
            date: Some(date(2024, 12, 8)),
            clicks: Some(450),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fields.clicks, 450);
        assert_eq!(fields.spend, Decimal::ZERO);
    }
}
