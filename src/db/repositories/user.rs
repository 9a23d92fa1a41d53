//! User repository
//!
//! Database operations for users.
//!
//! This module provides:
//! - `UserRepository` trait defining the interface for user data access
//! - `SqlxUserRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::{mysql_pool, sqlite_pool, DynDatabasePool};
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_USER: &str = r#"
    SELECT id, user_name, full_name, nickname, password, date_created, date_modified
    FROM users
"#;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; `user.password` must already be hashed
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by login name
    async fn get_by_user_name(&self, user_name: &str) -> Result<Option<User>>;
}

/// SQLx-based user repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_user_sqlite(sqlite_pool(&*self.pool)?, user).await,
            DatabaseDriver::Mysql => create_user_mysql(mysql_pool(&*self.pool)?, user).await,
        }
    }

    async fn get_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_user_by_name_sqlite(sqlite_pool(&*self.pool)?, user_name).await
            }
            DatabaseDriver::Mysql => {
                get_user_by_name_mysql(mysql_pool(&*self.pool)?, user_name).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_user_sqlite(pool: &SqlitePool, user: &User) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (user_name, full_name, nickname, password, date_created)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.user_name)
    .bind(&user.full_name)
    .bind(&user.nickname)
    .bind(&user.password)
    .bind(user.date_created)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to create user {}", user.user_name))?;

    Ok(User {
        id: result.last_insert_rowid(),
        ..user.clone()
    })
}

async fn get_user_by_name_sqlite(pool: &SqlitePool, user_name: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("{} WHERE user_name = ?", SELECT_USER))
        .bind(user_name)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by user_name")?;

    row.as_ref().map(row_to_user_sqlite).transpose()
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        user_name: row.try_get("user_name")?,
        full_name: row.try_get("full_name")?,
        nickname: row.try_get("nickname")?,
        password: row.try_get("password")?,
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_user_mysql(pool: &MySqlPool, user: &User) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (user_name, full_name, nickname, password, date_created)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.user_name)
    .bind(&user.full_name)
    .bind(&user.nickname)
    .bind(&user.password)
    .bind(user.date_created)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to create user {}", user.user_name))?;

    Ok(User {
        id: result.last_insert_id() as i64,
        ..user.clone()
    })
}

async fn get_user_by_name_mysql(pool: &MySqlPool, user_name: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("{} WHERE user_name = ?", SELECT_USER))
        .bind(user_name)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by user_name")?;

    row.as_ref().map(row_to_user_mysql).transpose()
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        user_name: row.try_get("user_name")?,
        full_name: row.try_get("full_name")?,
        nickname: row.try_get("nickname")?,
        password: row.try_get("password")?,
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxUserRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxUserRepository::new(pool.clone());
        (pool, repo)
    }

    fn test_user(user_name: &str) -> User {
        User::new(
            user_name.to_string(),
            format!("{} Fullname", user_name),
            None,
            "not-a-real-hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_user() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo.create(&test_user("dunder")).await.expect("Failed to create user");

        assert!(created.id > 0);
        assert_eq!(created.user_name, "dunder");
        assert_eq!(created.full_name, "dunder Fullname");
    }

    #[tokio::test]
    async fn test_get_user_by_name() {
        let (_pool, repo) = setup_test_repo().await;
        let mut user = test_user("b.deboop");
        user.nickname = Some("Bo".to_string());
        let created = repo.create(&user).await.expect("Failed to create user");

        let by_name = repo
            .get_by_user_name("b.deboop")
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.nickname.as_deref(), Some("Bo"));
        assert_eq!(by_name.password, "not-a-real-hash");
        assert!(by_name.date_modified.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_user_returns_none() {
        let (_pool, repo) = setup_test_repo().await;

        assert!(repo.get_by_user_name("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_name_fails() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&test_user("dunder")).await.unwrap();

        let err = repo.create(&test_user("dunder")).await.unwrap_err();

        assert!(crate::db::is_unique_violation(&err));
    }
}
