//! Frequency log endpoints
//!
//! Recording a submission for a period, and listing an indicator's logs.

use accredify_common::schedule::period_containing;
use accredify_common::ScheduleType;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::frequency_logs::{self, FrequencyLog};
use crate::db::indicators;
use crate::error::{ApiError, ApiResult};
use crate::models::ComplianceReport;
use crate::services::compliance;
use crate::AppState;

/// Frequency log submission request.
///
/// Period bounds default to the indicator's current anchor-aligned period
/// when omitted; supplying one bound without the other is an error.
#[derive(Debug, Deserialize)]
pub struct LogSubmissionRequest {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    pub submitted_by: Option<i64>,
}

/// Frequency log submission response: the created log plus the recalculated
/// compliance report
#[derive(Debug, Serialize)]
pub struct LogSubmissionResponse {
    pub log: FrequencyLog,
    pub compliance: ComplianceReport,
}

/// POST /api/indicators/{id}/frequency-logs
pub async fn submit_log(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
    Json(request): Json<LogSubmissionRequest>,
) -> ApiResult<Json<LogSubmissionResponse>> {
    let indicator = indicators::get_indicator(&state.db, indicator_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Indicator {} not found", indicator_id)))?;

    let today = Utc::now().date_naive();
    let (period_start, period_end) = match (request.period_start, request.period_end) {
        (Some(start), Some(end)) => {
            if end <= start {
                return Err(ApiError::BadRequest(
                    "period_end must be after period_start".to_string(),
                ));
            }
            (start, end)
        }
        (None, None) => match (indicator.schedule_type(), indicator.normalized_frequency()) {
            (ScheduleType::Recurring, Some(frequency)) => {
                let period = period_containing(indicator.anchor_date(), today, frequency);
                (period.start, period.end)
            }
            _ => {
                return Err(ApiError::BadRequest(
                    "Explicit period bounds are required for non-recurring indicators".to_string(),
                ))
            }
        },
        _ => {
            return Err(ApiError::BadRequest(
                "period_start and period_end must be supplied together".to_string(),
            ))
        }
    };

    let log_id = frequency_logs::insert_log(
        &state.db,
        indicator_id,
        period_start,
        period_end,
        request.submitted_by,
        &request.notes,
    )
    .await?;

    // A new submission can change derived status; recalculate immediately
    let compliance = compliance::recalculate_status(&state.db, indicator_id, today).await?;

    let logs = frequency_logs::list_for_indicator(&state.db, indicator_id).await?;
    let log = logs
        .into_iter()
        .find(|l| l.id == log_id)
        .ok_or_else(|| ApiError::Internal("Created log not found".to_string()))?;

    tracing::info!(indicator_id, log_id, "Frequency log recorded");

    Ok(Json(LogSubmissionResponse { log, compliance }))
}

/// GET /api/indicators/{id}/frequency-logs
pub async fn list_logs(
    State(state): State<AppState>,
    Path(indicator_id): Path<i64>,
) -> ApiResult<Json<Vec<FrequencyLog>>> {
    indicators::get_indicator(&state.db, indicator_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Indicator {} not found", indicator_id)))?;

    let logs = frequency_logs::list_for_indicator(&state.db, indicator_id).await?;
    Ok(Json(logs))
}

/// Build frequency log routes
pub fn frequency_log_routes() -> Router<AppState> {
    Router::new().route(
        "/api/indicators/:indicator_id/frequency-logs",
        post(submit_log).get(list_logs),
    )
}
