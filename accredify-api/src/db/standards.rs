//! Standard database operations
//!
//! Standards nest under sections with the same case-insensitive naming and
//! concurrent-creation semantics as sections.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

/// Standard record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Standard {
    pub id: i64,
    pub section_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Find a standard by name within a section (case-insensitive)
pub async fn find_by_name<'a, E>(
    executor: E,
    section_id: i64,
    name: &str,
) -> Result<Option<Standard>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let standard = sqlx::query_as::<_, Standard>(
        "SELECT id, section_id, name, created_at FROM standards WHERE section_id = ? AND name = ?",
    )
    .bind(section_id)
    .bind(name)
    .fetch_optional(executor)
    .await?;

    Ok(standard)
}

/// Insert a standard, returning its id, or None when the name already exists
/// in the section (concurrent creation)
pub async fn try_insert<'a, E>(executor: E, section_id: i64, name: &str) -> Result<Option<i64>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO standards (section_id, name, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(section_id, name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(section_id)
    .bind(name)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|(id,)| id))
}

/// List all standards under a section
pub async fn list_for_section<'a, E>(executor: E, section_id: i64) -> Result<Vec<Standard>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let standards = sqlx::query_as::<_, Standard>(
        "SELECT id, section_id, name, created_at FROM standards WHERE section_id = ? ORDER BY name",
    )
    .bind(section_id)
    .fetch_all(executor)
    .await?;

    Ok(standards)
}
