use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use studio_api::{ApiState, config::ApiConfig, notify::LogNotifier};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Open the slot calendar and booking ledger
    let repositories = studio_api::open_repositories(&config).await?;
    let state = Arc::new(ApiState::new(repositories, Arc::new(LogNotifier), &config)?);

    // Start API server
    studio_api::start_server(config, state).await?;

    Ok(())
}
