//! Indicator status history operations
//!
//! Append-only audit trail of status transitions. Never updated or deleted.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

/// Status history record
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub indicator_id: i64,
    pub old_status: String,
    pub new_status: String,
    pub changed_by: Option<i64>,
    pub notes: String,
    pub changed_at: DateTime<Utc>,
}

/// Append a status transition to the audit trail
pub async fn append_entry<'a, E>(
    executor: E,
    indicator_id: i64,
    old_status: &str,
    new_status: &str,
    changed_by: Option<i64>,
    notes: &str,
) -> Result<i64>
where
    E: Executor<'a, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO indicator_status_history (indicator_id, old_status, new_status, changed_by, notes, changed_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(indicator_id)
    .bind(old_status)
    .bind(new_status)
    .bind(changed_by)
    .bind(notes)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List the audit trail for an indicator, newest first
pub async fn list_for_indicator<'a, E>(
    executor: E,
    indicator_id: i64,
) -> Result<Vec<StatusHistoryEntry>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let entries = sqlx::query_as::<_, StatusHistoryEntry>(
        r#"
        SELECT id, indicator_id, old_status, new_status, changed_by, notes, changed_at
        FROM indicator_status_history
        WHERE indicator_id = ?
        ORDER BY changed_at DESC, id DESC
        "#,
    )
    .bind(indicator_id)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}
