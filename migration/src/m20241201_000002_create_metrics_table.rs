use sea_orm_migration::prelude::*;

use crate::m20241201_000001_create_campaigns_table::Campaigns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Metrics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Metrics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Metrics::CampaignId).uuid().not_null())
                    .col(ColumnDef::new(Metrics::Date).date().not_null())
                    .col(ColumnDef::new(Metrics::Impressions).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Metrics::Clicks).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Metrics::Engagements).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Metrics::Conversions).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Metrics::Spend)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Metrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_metrics_campaign_id")
                            .from(Metrics::Table, Metrics::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per campaign per day
        manager
            .create_index(
                Index::create()
                    .name("idx_metrics_campaign_id_date")
                    .table(Metrics::Table)
                    .col(Metrics::CampaignId)
                    .col(Metrics::Date)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Metrics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Metrics {
    Table,
    Id,
    CampaignId,
    Date,
    Impressions,
    Clicks,
    Engagements,
    Conversions,
    Spend,
    CreatedAt,
}
