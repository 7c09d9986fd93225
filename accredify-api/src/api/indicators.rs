//! Indicator status and compliance endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{indicators, status_history};
use crate::db::status_history::StatusHistoryEntry;
use crate::error::{ApiError, ApiResult};
use crate::models::{ComplianceReport, IndicatorStatus};
use crate::services::compliance;
use crate::AppState;

/// Status update request
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// Target status
    pub status: IndicatorStatus,
    /// Optional new score (0-100)
    pub score: Option<i64>,
    /// Optional note recorded in the audit trail
    #[serde(default)]
    pub notes: String,
    /// Optional acting user id
    pub changed_by: Option<i64>,
}

/// Status update response
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub indicator_id: i64,
    pub old_status: String,
    pub new_status: String,
}

/// POST /api/indicators/{id}/status
///
/// Applies a status transition and appends it to the audit trail.
pub async fn update_status(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
    Json(request): Json<StatusUpdateRequest>,
) -> ApiResult<Json<StatusUpdateResponse>> {
    if let Some(score) = request.score {
        if !(0..=100).contains(&score) {
            return Err(ApiError::BadRequest(format!(
                "Score must be between 0 and 100, got {}",
                score
            )));
        }
    }

    let indicator = indicators::get_indicator(&state.db, indicator_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Indicator {} not found", indicator_id)))?;

    let new_status = request.status.as_str();
    indicators::update_status(&state.db, indicator_id, new_status, request.score).await?;
    status_history::append_entry(
        &state.db,
        indicator_id,
        &indicator.status,
        new_status,
        request.changed_by,
        &request.notes,
    )
    .await?;

    tracing::info!(
        indicator_id,
        old = %indicator.status,
        new = %new_status,
        "Indicator status updated"
    );

    Ok(Json(StatusUpdateResponse {
        indicator_id,
        old_status: indicator.status,
        new_status: new_status.to_string(),
    }))
}

/// GET /api/indicators/{id}/compliance
pub async fn get_compliance(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
) -> ApiResult<Json<ComplianceReport>> {
    let indicator = indicators::get_indicator(&state.db, indicator_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Indicator {} not found", indicator_id)))?;

    let report =
        compliance::compliance_report(&state.db, &indicator, Utc::now().date_naive()).await?;

    Ok(Json(report))
}

/// GET /api/indicators/{id}/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
) -> ApiResult<Json<Vec<StatusHistoryEntry>>> {
    indicators::get_indicator(&state.db, indicator_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Indicator {} not found", indicator_id)))?;

    let entries = status_history::list_for_indicator(&state.db, indicator_id).await?;
    Ok(Json(entries))
}

/// Active-flag update request
#[derive(Debug, Deserialize)]
pub struct ActiveUpdateRequest {
    pub is_active: bool,
}

/// POST /api/indicators/{id}/active
///
/// Deactivated indicators drop out of task feeds without losing history.
pub async fn update_active(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
    Json(request): Json<ActiveUpdateRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    indicators::get_indicator(&state.db, indicator_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Indicator {} not found", indicator_id)))?;

    indicators::set_active(&state.db, indicator_id, request.is_active).await?;

    Ok(Json(serde_json::json!({
        "indicator_id": indicator_id,
        "is_active": request.is_active,
    })))
}

/// Build indicator routes
pub fn indicator_routes() -> Router<AppState> {
    Router::new()
        .route("/api/indicators/:indicator_id/status", post(update_status))
        .route("/api/indicators/:indicator_id/compliance", get(get_compliance))
        .route("/api/indicators/:indicator_id/history", get(get_history))
        .route("/api/indicators/:indicator_id/active", post(update_active))
}
