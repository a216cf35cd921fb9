//! Explicit persistence calls for campaigns and their daily metrics.
//!
//! Every method takes or returns plain entity models; nothing is saved implicitly.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{campaign, metric, CampaignStatus};
use crate::error::AppError;
use crate::validation::{CampaignFields, MetricFields, ValidationErrors, NON_FIELD_ERRORS};

/// Largest page a client may request
pub const MAX_PAGE_SIZE: u64 = 100;

/// Filtering, ordering and paging for the campaign listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignQuery {
    /// Whitespace-separated terms; each must match name, platform or status
    pub search: Option<String>,
    /// Comma-separated fields, `-` prefix for descending
    pub ordering: Option<String>,
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignPage {
    pub count: u64,
    pub page: u64,
    pub num_pages: u64,
    pub campaigns: Vec<campaign::Model>,
}

/// Fields a campaign listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Name,
    Status,
}

impl SortField {
    fn column(self) -> campaign::Column {
        match self {
            SortField::CreatedAt => campaign::Column::CreatedAt,
            SortField::Name => campaign::Column::Name,
            SortField::Status => campaign::Column::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// Translates an `ordering` parameter into sort keys.
/// Unknown fields are skipped; an empty result falls back to newest first.
pub fn parse_ordering(ordering: Option<&str>) -> Vec<SortKey> {
    let mut keys: Vec<SortKey> = ordering
        .unwrap_or_default()
        .split(',')
        .filter_map(|raw| {
            let raw = raw.trim();
            let (name, descending) = match raw.strip_prefix('-') {
                Some(name) => (name, true),
                None => (raw, false),
            };
            let field = match name {
                "created_at" => SortField::CreatedAt,
                "name" => SortField::Name,
                "status" => SortField::Status,
                _ => return None,
            };
            Some(SortKey { field, descending })
        })
        .collect();

    if keys.is_empty() {
        keys.push(SortKey { field: SortField::CreatedAt, descending: true });
    }
    keys
}

/// Escapes LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match on a text column
fn icontains(column: campaign::Column, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn search_condition(search: &str) -> Condition {
    search.split_whitespace().fold(Condition::all(), |all, term| {
        all.add(
            Condition::any()
                .add(icontains(campaign::Column::Name, term))
                .add(icontains(campaign::Column::Platform, term))
                .add(icontains(campaign::Column::Status, term)),
        )
    })
}

#[derive(Debug, Clone)]
pub struct CampaignRepository {
    db: DatabaseConnection,
}

impl CampaignRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self, fields), fields(name = %fields.name))]
    pub async fn create(&self, fields: CampaignFields) -> Result<campaign::Model, AppError> {
        let now = Utc::now();
        let model = campaign::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(fields.name),
            description: Set(fields.description),
            platform: Set(fields.platform),
            status: Set(fields.status),
            start_date: Set(fields.start_date),
            end_date: Set(fields.end_date),
            budget: Set(fields.budget),
            impressions: Set(fields.impressions),
            clicks: Set(fields.clicks),
            conversions: Set(fields.conversions),
            engagement_rate: Set(fields.engagement_rate),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(campaign_id = %model.id, "Created campaign");
        Ok(model)
    }

    #[tracing::instrument(skip(self))]
    pub async fn find(&self, id: Uuid) -> Result<campaign::Model, AppError> {
        campaign::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("campaign {}", id)))
    }

    /// Replaces every writable field of an existing campaign.
    #[tracing::instrument(skip(self, fields))]
    pub async fn update(&self, id: Uuid, fields: CampaignFields) -> Result<campaign::Model, AppError> {
        let existing = self.find(id).await?;
        let mut model: campaign::ActiveModel = existing.into();
        model.name = Set(fields.name);
        model.description = Set(fields.description);
        model.platform = Set(fields.platform);
        model.status = Set(fields.status);
        model.start_date = Set(fields.start_date);
        model.end_date = Set(fields.end_date);
        model.budget = Set(fields.budget);
        model.impressions = Set(fields.impressions);
        model.clicks = Set(fields.clicks);
        model.conversions = Set(fields.conversions);
        model.engagement_rate = Set(fields.engagement_rate);
        model.updated_at = Set(Utc::now());

        Ok(model.update(&self.db).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_status(&self, id: Uuid, status: CampaignStatus) -> Result<campaign::Model, AppError> {
        let existing = self.find(id).await?;
        let mut model: campaign::ActiveModel = existing.into();
        model.status = Set(status);
        model.updated_at = Set(Utc::now());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a campaign together with all of its metrics.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find(id).await?;

        let txn = self.db.begin().await?;
        let removed = metric::Entity::delete_many()
            .filter(metric::Column::CampaignId.eq(id))
            .exec(&txn)
            .await?;
        campaign::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(campaign_id = %id, metrics_removed = removed.rows_affected, "Deleted campaign");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &CampaignQuery) -> Result<CampaignPage, AppError> {
        let mut select = campaign::Entity::find();
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            select = select.filter(search_condition(search));
        }
        for key in parse_ordering(query.ordering.as_deref()) {
            let order = if key.descending { Order::Desc } else { Order::Asc };
            select = select.order_by(key.field.column(), order);
        }
        select = select.order_by_asc(campaign::Column::Id);

        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
        let page = query.page.max(1);
        let paginator = select.paginate(&self.db, page_size);
        let totals = paginator.num_items_and_pages().await?;

        if page > 1 && page > totals.number_of_pages {
            return Err(AppError::NotFound("Invalid page.".to_string()));
        }

        let campaigns = paginator.fetch_page(page - 1).await?;
        Ok(CampaignPage {
            count: totals.number_of_items,
            page,
            num_pages: totals.number_of_pages,
            campaigns,
        })
    }

    pub async fn list_by_status(&self, status: CampaignStatus) -> Result<Vec<campaign::Model>, AppError> {
        Ok(campaign::Entity::find()
            .filter(campaign::Column::Status.eq(status))
            .order_by_desc(campaign::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn all_campaigns(&self) -> Result<Vec<campaign::Model>, AppError> {
        Ok(campaign::Entity::find().all(&self.db).await?)
    }

    pub async fn count_campaigns(&self) -> Result<u64, AppError> {
        Ok(campaign::Entity::find().count(&self.db).await?)
    }

    pub async fn all_metrics(&self) -> Result<Vec<metric::Model>, AppError> {
        Ok(metric::Entity::find().all(&self.db).await?)
    }

    /// Metrics of one campaign, newest day first
    pub async fn metrics_for(&self, campaign_id: Uuid) -> Result<Vec<metric::Model>, AppError> {
        Ok(metric::Entity::find()
            .filter(metric::Column::CampaignId.eq(campaign_id))
            .order_by_desc(metric::Column::Date)
            .all(&self.db)
            .await?)
    }

    /// Metrics of several campaigns grouped by campaign id, newest day first
    pub async fn metrics_by_campaign(
        &self,
        campaign_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<metric::Model>>, AppError> {
        if campaign_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = metric::Entity::find()
            .filter(metric::Column::CampaignId.is_in(campaign_ids.iter().copied()))
            .order_by_desc(metric::Column::Date)
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<metric::Model>> = HashMap::new();
        for row in rows {
            grouped.entry(row.campaign_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Records one day of figures for a campaign; a second row for the same day is rejected.
    #[tracing::instrument(skip(self, fields), fields(date = %fields.date))]
    pub async fn create_metric(&self, campaign_id: Uuid, fields: MetricFields) -> Result<metric::Model, AppError> {
        self.find(campaign_id).await?;

        let duplicate = metric::Entity::find()
            .filter(metric::Column::CampaignId.eq(campaign_id))
            .filter(metric::Column::Date.eq(fields.date))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Validation(ValidationErrors::single(
                NON_FIELD_ERRORS,
                "The fields campaign, date must make a unique set.",
            )));
        }

        let model = metric::ActiveModel {
            id: Set(Uuid::new_v4()),
            campaign_id: Set(campaign_id),
            date: Set(fields.date),
            impressions: Set(fields.impressions),
            clicks: Set(fields.clicks),
            engagements: Set(fields.engagements),
            conversions: Set(fields.conversions),
            spend: Set(fields.spend),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(model)
    }
}
