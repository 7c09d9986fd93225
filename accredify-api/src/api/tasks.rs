//! Upcoming-tasks endpoint

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::db::projects;
use crate::error::{ApiError, ApiResult};
use crate::models::UpcomingTask;
use crate::services::task_feed::{self, DEFAULT_LOOKAHEAD_DAYS};
use crate::AppState;

/// Query parameters for the task feed
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Look-ahead window in days (default 30)
    pub days: Option<i64>,
}

/// GET /api/projects/{id}/upcoming-tasks?days=N
pub async fn upcoming_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Vec<UpcomingTask>>> {
    projects::get_project(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", project_id)))?;

    let days = query.days.unwrap_or(DEFAULT_LOOKAHEAD_DAYS);
    if days < 0 {
        return Err(ApiError::BadRequest("days must be non-negative".to_string()));
    }

    let tasks =
        task_feed::upcoming_tasks(&state.db, project_id, days, Utc::now().date_naive()).await?;

    Ok(Json(tasks))
}

/// Build task feed routes
pub fn task_routes() -> Router<AppState> {
    Router::new().route("/api/projects/:project_id/upcoming-tasks", get(upcoming_tasks))
}
