//! accredify-api - Compliance Portal Core Service
//!
//! Owns the CSV import/reconciliation engine, the compliance scheduling
//! engine, and the upcoming-tasks feed over SQLite. Authentication, file
//! storage, and the web UI live in other services and consume this one over
//! HTTP REST.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use accredify_api::services::frequency_analyzer::FrequencyAnalyzer;
use accredify_api::AppState;
use accredify_common::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting accredify-api (Compliance Portal Core)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(None)?;
    info!("Database: {}", config.database_path.display());

    let db_pool = accredify_api::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let analyzer = FrequencyAnalyzer::from_config(&config);
    let state = AppState::new(db_pool, analyzer);

    let app = accredify_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
