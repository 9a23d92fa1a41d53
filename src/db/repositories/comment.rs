//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::{mysql_pool, sqlite_pool, DynDatabasePool};
use crate::models::{Author, Comment, CommentWithAuthor, CreateCommentInput};

const SELECT_COMMENT_WITH_AUTHOR: &str = r#"
    SELECT
        c.id, c.text, c.article_id, c.date_commented,
        u.id AS author_id,
        u.user_name AS author_user_name,
        u.full_name AS author_full_name,
        u.nickname AS author_nickname,
        u.date_created AS author_date_created
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment; fails if the article or user does not exist
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment>;

    /// Get a comment by ID with its author resolved
    async fn get_by_id(&self, id: i64) -> Result<Option<CommentWithAuthor>>;

    /// Comments belonging to an article, in insertion order
    async fn list_by_article(&self, article_id: i64) -> Result<Vec<CommentWithAuthor>>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(sqlite_pool(&*self.pool)?, input).await,
            DatabaseDriver::Mysql => create_mysql(mysql_pool(&*self.pool)?, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<CommentWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(sqlite_pool(&*self.pool)?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(mysql_pool(&*self.pool)?, id).await,
        }
    }

    async fn list_by_article(&self, article_id: i64) -> Result<Vec<CommentWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_article_sqlite(sqlite_pool(&*self.pool)?, article_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_article_mysql(mysql_pool(&*self.pool)?, article_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_sqlite(pool: &SqlitePool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO comments (text, article_id, user_id, date_commented) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.text)
    .bind(input.article_id)
    .bind(input.user_id)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        text: input.text.clone(),
        article_id: input.article_id,
        user_id: input.user_id,
        date_commented: now,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<CommentWithAuthor>> {
    let row = sqlx::query(&format!("{} WHERE c.id = ?", SELECT_COMMENT_WITH_AUTHOR))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    row.as_ref().map(row_to_comment_sqlite).transpose()
}

async fn list_by_article_sqlite(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<CommentWithAuthor>> {
    let rows = sqlx::query(&format!(
        "{} WHERE c.article_id = ? ORDER BY c.id ASC",
        SELECT_COMMENT_WITH_AUTHOR
    ))
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments for article")?;

    rows.iter().map(row_to_comment_sqlite).collect()
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<CommentWithAuthor> {
    Ok(CommentWithAuthor {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        article_id: row.try_get("article_id")?,
        date_commented: row.try_get("date_commented")?,
        author: Author {
            id: row.try_get("author_id")?,
            user_name: row.try_get("author_user_name")?,
            full_name: row.try_get("author_full_name")?,
            nickname: row.try_get("author_nickname")?,
            date_created: row.try_get("author_date_created")?,
        },
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO comments (text, article_id, user_id, date_commented) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.text)
    .bind(input.article_id)
    .bind(input.user_id)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_id() as i64,
        text: input.text.clone(),
        article_id: input.article_id,
        user_id: input.user_id,
        date_commented: now,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<CommentWithAuthor>> {
    let row = sqlx::query(&format!("{} WHERE c.id = ?", SELECT_COMMENT_WITH_AUTHOR))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    row.as_ref().map(row_to_comment_mysql).transpose()
}

async fn list_by_article_mysql(
    pool: &MySqlPool,
    article_id: i64,
) -> Result<Vec<CommentWithAuthor>> {
    let rows = sqlx::query(&format!(
        "{} WHERE c.article_id = ? ORDER BY c.id ASC",
        SELECT_COMMENT_WITH_AUTHOR
    ))
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments for article")?;

    rows.iter().map(row_to_comment_mysql).collect()
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Result<CommentWithAuthor> {
    Ok(CommentWithAuthor {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        article_id: row.try_get("article_id")?,
        date_commented: row.try_get("date_commented")?,
        author: Author {
            id: row.try_get("author_id")?,
            user_name: row.try_get("author_user_name")?,
            full_name: row.try_get("author_full_name")?,
            nickname: row.try_get("author_nickname")?,
            date_created: row.try_get("author_date_created")?,
        },
    })
}
