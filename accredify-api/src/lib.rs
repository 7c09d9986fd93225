//! accredify-api library interface
//!
//! Exposes the import engine, scheduling services, and HTTP surface for
//! integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::frequency_analyzer::FrequencyAnalyzer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Frequency analyzer (rule-based, optionally AI-assisted)
    pub analyzer: Arc<FrequencyAnalyzer>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, analyzer: FrequencyAnalyzer) -> Self {
        Self {
            db,
            analyzer: Arc::new(analyzer),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::import_routes())
        .merge(api::task_routes())
        .merge(api::indicator_routes())
        .merge(api::frequency_log_routes())
        .with_state(state)
}
