//! Status transitions and duplication of campaigns.

use uuid::Uuid;

use crate::entities::{campaign, CampaignStatus};
use crate::error::AppError;
use crate::repository::CampaignRepository;
use crate::validation::{CampaignFields, NAME_MAX_LEN};

/// Suffix appended to the name of a duplicated campaign
pub const COPY_SUFFIX: &str = " (Copy)";

/// Name for a copy of `name`, shortened so that the suffixed result still fits the name limit
pub fn copy_name(name: &str) -> String {
    let keep = NAME_MAX_LEN - COPY_SUFFIX.chars().count();
    let base: String = name.chars().take(keep).collect();
    format!("{}{}", base.trim_end(), COPY_SUFFIX)
}

pub async fn list_active(repo: &CampaignRepository) -> Result<Vec<campaign::Model>, AppError> {
    repo.list_by_status(CampaignStatus::Active).await
}

#[tracing::instrument(skip(repo))]
pub async fn pause(repo: &CampaignRepository, id: Uuid) -> Result<campaign::Model, AppError> {
    repo.set_status(id, CampaignStatus::Paused).await
}

#[tracing::instrument(skip(repo))]
pub async fn resume(repo: &CampaignRepository, id: Uuid) -> Result<campaign::Model, AppError> {
    repo.set_status(id, CampaignStatus::Active).await
}

/// Creates a new campaign carrying every field of the source, under a new id and
/// a suffixed name. Counters are copied as-is; metrics are not.
#[tracing::instrument(skip(repo))]
pub async fn duplicate(repo: &CampaignRepository, id: Uuid) -> Result<campaign::Model, AppError> {
    let source = repo.find(id).await?;

    let mut fields = CampaignFields::from(&source);
    fields.name = copy_name(&source.name);

    let copy = repo.create(fields).await?;
    tracing::info!(source_id = %source.id, copy_id = %copy.id, "Duplicated campaign");
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_name_appends_suffix() {
        assert_eq!(copy_name("Summer Sale 2024"), "Summer Sale 2024 (Copy)");
    }

    #[test]
    fn copy_name_stays_within_limit() {
        let long = "é".repeat(NAME_MAX_LEN);
        let copied = copy_name(&long);
        assert_eq!(copied.chars().count(), NAME_MAX_LEN);
        assert!(copied.ends_with(COPY_SUFFIX));

        let fits = "a".repeat(NAME_MAX_LEN - COPY_SUFFIX.len());
        assert_eq!(copy_name(&fits), format!("{}{}", fits, COPY_SUFFIX));
    }
}
