#![allow(clippy::result_large_err)]

use balance_analytics::{
    api,
    config::{self, categories::seed_default_categories, database},
    core::AnalyticsEngine,
    errors::Result,
    repository::SeaOrmRepository,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed shared default categories
    seed_default_categories(&db, &app_config.default_categories)
        .await
        .inspect_err(|e| error!("Failed to seed default categories: {}", e))?;

    // 6. Serve until shutdown
    let engine = AnalyticsEngine::new(SeaOrmRepository::new(db.clone()));
    api::serve(&app_config, engine)
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    db.close().await?;
    info!("Database connection closed.");
    Ok(())
}
