//! CSV import endpoint

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;

use crate::db::projects;
use crate::error::{ApiError, ApiResult};
use crate::models::ImportSummary;
use crate::services::csv_importer::{CsvImporter, ImportError};
use crate::AppState;

/// POST /api/projects/{id}/import
///
/// Body is the raw CSV file. Row-level problems are reported inside the
/// summary; structural problems (header mismatch, unreadable file) are a 400
/// with no rows written.
pub async fn import_csv(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    body: Bytes,
) -> ApiResult<Json<ImportSummary>> {
    projects::get_project(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", project_id)))?;

    tracing::info!(project_id, bytes = body.len(), "Starting CSV import");

    let importer = CsvImporter::new(&state.db, &state.analyzer, project_id);
    let summary = importer
        .import(&body, Utc::now().date_naive())
        .await
        .map_err(|e| match e {
            ImportError::InvalidHeader(_) | ImportError::Csv(_) => {
                ApiError::BadRequest(e.to_string())
            }
            ImportError::Internal(err) => ApiError::Other(err),
        })?;

    Ok(Json(summary))
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new().route("/api/projects/:project_id/import", post(import_csv))
}
