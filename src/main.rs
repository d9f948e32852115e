use anyhow::Result;
use clap::{Parser, Subcommand};
use spacetrack_scraper::apis::space_track::SpaceTrackTransport;
use spacetrack_scraper::config::Config;
use spacetrack_scraper::logging;
use spacetrack_scraper::pipeline::Pipeline;
use spacetrack_scraper::storage::OrbitStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "spacetrack_scraper")]
#[command(about = "Space-Track satellite catalog scraper")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the current catalog snapshot and persist it
    Fetch {
        /// Path to the INI configuration file
        #[arg(long, default_value = "SLTrack.ini")]
        config: PathBuf,
    },
    /// Run database migrations (requires the `db` feature)
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { config } => {
            let config = Config::load(&config)?;
            let transport = SpaceTrackTransport::new()?;
            let store = build_store().await?;

            let report = Pipeline::run(&config, &transport, store).await?;
            info!("ingest run finished");

            println!("\n📊 Ingest results for {}:", report.api_name);
            println!("   Records fetched: {}", report.records_fetched);
            println!("   Records persisted: {}", report.records_persisted);
            println!("   Snapshot sha256: {}", report.snapshot_sha256);
        }
        Commands::Migrate => run_migrations().await?,
    }

    Ok(())
}

#[cfg(feature = "db")]
async fn build_store() -> Result<Arc<dyn OrbitStore>> {
    let storage = spacetrack_scraper::db::DatabaseStorage::new().await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "db"))]
async fn build_store() -> Result<Arc<dyn OrbitStore>> {
    tracing::warn!("built without the `db` feature; persisting to in-memory storage only");
    Ok(Arc::new(spacetrack_scraper::storage::InMemoryStorage::new()))
}

#[cfg(feature = "db")]
async fn run_migrations() -> Result<()> {
    let db = spacetrack_scraper::db::DatabaseManager::new().await?;
    db.run_migrations().await?;
    println!("✅ Migrations applied");
    Ok(())
}

#[cfg(not(feature = "db"))]
async fn run_migrations() -> Result<()> {
    anyhow::bail!("rebuild with `--features db` to run migrations")
}
