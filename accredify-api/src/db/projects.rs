//! Project database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

/// Project record (top-level compliance scope)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create a new project, returning its id
pub async fn create_project<'a, E>(executor: E, name: &str, description: &str) -> Result<i64>
where
    E: Executor<'a, Database = Sqlite>,
{
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO projects (name, description, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Load a project by id
pub async fn get_project<'a, E>(executor: E, project_id: i64) -> Result<Option<Project>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let project = sqlx::query_as::<_, Project>(
        "SELECT id, name, description, created_at, updated_at FROM projects WHERE id = ?",
    )
    .bind(project_id)
    .fetch_optional(executor)
    .await?;

    Ok(project)
}
