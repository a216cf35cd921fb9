use campaign_analytics::{config::AppConfig, db, repository::CampaignRepository, sample_data};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing (INFO level)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    let conn = db::connect(&config).await?;
    let repo = CampaignRepository::new(conn);

    match sample_data::load(&repo).await {
        Ok(true) => info!("Sample data created successfully"),
        Ok(false) => info!("Database already has campaigns; nothing to do"),
        Err(e) => {
            error!(?e, "failed to load sample data");
            return Err(e.into());
        }
    }
    Ok(())
}
