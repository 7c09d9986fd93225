//! User directory lookups
//!
//! Account provisioning is owned by the authentication layer; the core only
//! resolves import assignee text against existing accounts. Email and
//! username columns are COLLATE NOCASE so equality matches are
//! case-insensitive at the storage layer.

use anyhow::Result;
use sqlx::{Executor, Sqlite};

/// User account record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// Find a user by exact (case-insensitive) email
pub async fn find_by_email<'a, E>(executor: E, email: &str) -> Result<Option<User>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, full_name FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// Find a user by exact (case-insensitive) username
pub async fn find_by_username<'a, E>(executor: E, username: &str) -> Result<Option<User>>
where
    E: Executor<'a, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, full_name FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// Create a user account (used by fixtures and admin tooling)
pub async fn create_user<'a, E>(
    executor: E,
    username: &str,
    email: &str,
    full_name: &str,
) -> Result<i64>
where
    E: Executor<'a, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO users (username, email, full_name) VALUES (?, ?, ?)")
        .bind(username)
        .bind(email)
        .bind(full_name)
        .execute(executor)
        .await?;

    Ok(result.last_insert_rowid())
}
