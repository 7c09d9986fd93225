//! Shared test fixtures

use accredify_api::db;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

/// In-memory database with the full schema
pub async fn setup_pool() -> SqlitePool {
    db::init_memory_pool().await.expect("Failed to create test database")
}

/// Create a project and return its id
pub async fn create_project(pool: &SqlitePool, name: &str) -> i64 {
    db::projects::create_project(pool, name, "")
        .await
        .expect("Failed to create test project")
}

/// Create a user account and return its id
#[allow(dead_code)]
pub async fn create_user(pool: &SqlitePool, username: &str, email: &str, full_name: &str) -> i64 {
    db::users::create_user(pool, username, email, full_name)
        .await
        .expect("Failed to create test user")
}

/// Rewrite an indicator's creation timestamp so period anchors are
/// deterministic in tests
#[allow(dead_code)]
pub async fn set_indicator_anchor(pool: &SqlitePool, indicator_id: i64, anchor: NaiveDate) {
    let created_at: DateTime<Utc> = anchor
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
        .and_utc();
    sqlx::query("UPDATE indicators SET created_at = ? WHERE id = ?")
        .bind(created_at)
        .bind(indicator_id)
        .execute(pool)
        .await
        .expect("Failed to set indicator anchor");
}

/// Build a CSV file with the standard header and the given data rows
#[allow(dead_code)]
pub fn csv_with_rows(rows: &[&str]) -> Vec<u8> {
    let header = "Section,Standard,Indicator,Evidence Required,Responsible Person,Frequency,Assigned to,Compliance Evidence,Score";
    let mut content = String::from(header);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.into_bytes()
}

/// A fixed "today" for deterministic scheduling tests
#[allow(dead_code)]
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}
