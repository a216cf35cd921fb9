use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Campaigns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Campaigns::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Campaigns::Description).text().null())
                    .col(ColumnDef::new(Campaigns::Platform).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Campaigns::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Campaigns::StartDate).date().not_null())
                    .col(ColumnDef::new(Campaigns::EndDate).date().null())
                    .col(ColumnDef::new(Campaigns::Budget).decimal_len(10, 2).null())
                    .col(ColumnDef::new(Campaigns::Impressions).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::Clicks).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::Conversions).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::EngagementRate).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing defaults to newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_campaigns_created_at")
                    .table(Campaigns::Table)
                    .col(Campaigns::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Campaigns {
    Table,
    Id,
    Name,
    Description,
    Platform,
    Status,
    StartDate,
    EndDate,
    Budget,
    Impressions,
    Clicks,
    Conversions,
    EngagementRate,
    CreatedAt,
    UpdatedAt,
}
