//! Section database operations
//!
//! Sections are the top grouping level under a project. Name matching is
//! case-insensitive (COLLATE NOCASE column). Creation happens through
//! `try_insert` + re-fetch so a unique-constraint hit from a concurrent
//! import resolves to "already exists" instead of failing the caller.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

/// Section record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Section {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Find a section by name within a project (case-insensitive)
pub async fn find_by_name<'a, E>(
    executor: E,
    project_id: i64,
    name: &str,
) -> Result<Option<Section>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let section = sqlx::query_as::<_, Section>(
        "SELECT id, project_id, name, created_at FROM sections WHERE project_id = ? AND name = ?",
    )
    .bind(project_id)
    .bind(name)
    .fetch_optional(executor)
    .await?;

    Ok(section)
}

/// Insert a section, returning its id, or None when the name already exists
/// in the project (concurrent creation)
pub async fn try_insert<'a, E>(executor: E, project_id: i64, name: &str) -> Result<Option<i64>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO sections (project_id, name, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(project_id, name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(project_id)
    .bind(name)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|(id,)| id))
}

/// List all sections for a project
pub async fn list_for_project<'a, E>(executor: E, project_id: i64) -> Result<Vec<Section>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let sections = sqlx::query_as::<_, Section>(
        "SELECT id, project_id, name, created_at FROM sections WHERE project_id = ? ORDER BY name",
    )
    .bind(project_id)
    .fetch_all(executor)
    .await?;

    Ok(sections)
}
