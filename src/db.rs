use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::AppConfig;

/// Opens the connection pool and brings the schema up to date.
pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let url = config.database_url.as_str();
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    // Each pooled connection to an in-memory SQLite database is a separate database
    if url.starts_with("sqlite") && url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    tracing::info!(
        "Connecting to database: {}",
        if url.starts_with("postgres") { "PostgreSQL" } else { "SQLite" }
    );
    let db = Database::connect(options).await?;

    Migrator::up(&db, None).await?;
    Ok(db)
}
