//! Frequency log database operations
//!
//! A frequency log records that a compliance submission was made for one
//! period of a recurring indicator. Rows are immutable historical events:
//! insert and read only, no update path.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Sqlite};

/// Frequency log record (one compliance submission for one period)
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct FrequencyLog {
    pub id: i64,
    pub indicator_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    pub submitted_by: Option<i64>,
    pub notes: String,
}

/// Record a compliance submission for a period, returning the log id
pub async fn insert_log<'a, E>(
    executor: E,
    indicator_id: i64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    submitted_by: Option<i64>,
    notes: &str,
) -> Result<i64>
where
    E: Executor<'a, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO frequency_logs (indicator_id, period_start, period_end, submitted_at, submitted_by, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(indicator_id)
    .bind(period_start)
    .bind(period_end)
    .bind(Utc::now())
    .bind(submitted_by)
    .bind(notes)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Whether a log exists whose period exactly matches the given bounds
pub async fn exists_for_period<'a, E>(
    executor: E,
    indicator_id: i64,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<bool>
where
    E: Executor<'a, Database = Sqlite>,
{
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM frequency_logs
        WHERE indicator_id = ? AND period_start = ? AND period_end = ?
        "#,
    )
    .bind(indicator_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_one(executor)
    .await?;

    Ok(count > 0)
}

/// List all logs for an indicator, newest first
pub async fn list_for_indicator<'a, E>(
    executor: E,
    indicator_id: i64,
) -> Result<Vec<FrequencyLog>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let logs = sqlx::query_as::<_, FrequencyLog>(
        r#"
        SELECT id, indicator_id, period_start, period_end, submitted_at, submitted_by, notes
        FROM frequency_logs
        WHERE indicator_id = ?
        ORDER BY submitted_at DESC
        "#,
    )
    .bind(indicator_id)
    .fetch_all(executor)
    .await?;

    Ok(logs)
}

/// Distinct logged periods for an indicator (for coverage calculation)
pub async fn logged_periods<'a, E>(
    executor: E,
    indicator_id: i64,
) -> Result<Vec<(NaiveDate, NaiveDate)>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let periods: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
        r#"
        SELECT DISTINCT period_start, period_end FROM frequency_logs
        WHERE indicator_id = ?
        ORDER BY period_start
        "#,
    )
    .bind(indicator_id)
    .fetch_all(executor)
    .await?;

    Ok(periods)
}

/// Most recent submission timestamp for an indicator, if any
pub async fn last_submitted_at<'a, E>(
    executor: E,
    indicator_id: i64,
) -> Result<Option<DateTime<Utc>>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
        "SELECT submitted_at FROM frequency_logs WHERE indicator_id = ? ORDER BY submitted_at DESC LIMIT 1",
    )
    .bind(indicator_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|(ts,)| ts))
}
