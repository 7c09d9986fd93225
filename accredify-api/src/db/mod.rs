//! Database access for accredify-api
//!
//! SQLite persistence for the compliance hierarchy
//! (Project -> Section -> Standard -> Indicator) plus frequency logs and the
//! status-history audit trail. Query modules are one file per table.

pub mod frequency_logs;
pub mod indicators;
pub mod projects;
pub mod sections;
pub mod standards;
pub mod status_history;
pub mod users;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create an in-memory pool with the full schema (test fixtures)
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Initialize tables if they don't exist
///
/// Section and standard names use COLLATE NOCASE so that scoping and the
/// unique constraints are case-insensitive at the storage layer, matching the
/// import engine's grouping rules. Unique constraints double as the guard
/// against duplicate creation across concurrent imports.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE COLLATE NOCASE,
            email TEXT NOT NULL COLLATE NOCASE,
            full_name TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            name TEXT NOT NULL COLLATE NOCASE,
            created_at TEXT NOT NULL,
            UNIQUE(project_id, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS standards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            section_id INTEGER NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            name TEXT NOT NULL COLLATE NOCASE,
            created_at TEXT NOT NULL,
            UNIQUE(section_id, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS indicators (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            section_id INTEGER REFERENCES sections(id) ON DELETE SET NULL,
            standard_id INTEGER REFERENCES standards(id) ON DELETE SET NULL,
            requirement TEXT NOT NULL,
            evidence_required TEXT NOT NULL DEFAULT '',
            responsible_person TEXT NOT NULL DEFAULT '',
            frequency TEXT NOT NULL DEFAULT '',
            schedule_type TEXT NOT NULL DEFAULT 'one_time',
            normalized_frequency TEXT NOT NULL DEFAULT '',
            next_due_date TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            status TEXT NOT NULL DEFAULT 'not_compliant',
            score INTEGER NOT NULL DEFAULT 10,
            assigned_to TEXT NOT NULL DEFAULT '',
            assigned_user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
            compliance_notes TEXT NOT NULL DEFAULT '',
            indicator_key TEXT NOT NULL UNIQUE,
            ai_confidence_score REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS frequency_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            indicator_id INTEGER NOT NULL REFERENCES indicators(id) ON DELETE CASCADE,
            period_start TEXT NOT NULL,
            period_end TEXT NOT NULL,
            submitted_at TEXT NOT NULL,
            submitted_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
            notes TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS indicator_status_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            indicator_id INTEGER NOT NULL REFERENCES indicators(id) ON DELETE CASCADE,
            old_status TEXT NOT NULL,
            new_status TEXT NOT NULL,
            changed_by INTEGER REFERENCES users(id) ON DELETE SET NULL,
            notes TEXT NOT NULL DEFAULT '',
            changed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_indicators_project ON indicators(project_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_frequency_logs_indicator ON frequency_logs(indicator_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized");

    Ok(())
}
