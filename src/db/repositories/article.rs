//! Article repository
//!
//! Database operations for articles. Reads join the author row and count the
//! article's comments so callers receive the serialized shape directly.

use crate::config::DatabaseDriver;
use crate::db::{mysql_pool, sqlite_pool, DynDatabasePool};
use crate::models::{Article, ArticleWithAuthor, Author, CreateArticleInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article columns, resolved author columns and the comment count.
/// Author columns are aliased so they cannot collide with article columns.
const SELECT_ARTICLE_WITH_AUTHOR: &str = r#"
    SELECT
        a.id, a.title, a.content, a.date_published,
        u.id AS author_id,
        u.user_name AS author_user_name,
        u.full_name AS author_full_name,
        u.nickname AS author_nickname,
        u.date_created AS author_date_created,
        (SELECT COUNT(*) FROM comments c WHERE c.article_id = a.id) AS number_of_comments
    FROM articles a
    JOIN users u ON u.id = a.author_id
"#;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert an article
    async fn create(&self, input: &CreateArticleInput) -> Result<Article>;

    /// All articles in insertion order
    async fn list(&self) -> Result<Vec<ArticleWithAuthor>>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleWithAuthor>>;

    /// Check whether an article exists
    async fn exists(&self, id: i64) -> Result<bool>;
}

/// SQLx-based article repository implementation
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, input: &CreateArticleInput) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_article_sqlite(sqlite_pool(&*self.pool)?, input).await,
            DatabaseDriver::Mysql => create_article_mysql(mysql_pool(&*self.pool)?, input).await,
        }
    }

    async fn list(&self) -> Result<Vec<ArticleWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_articles_sqlite(sqlite_pool(&*self.pool)?).await,
            DatabaseDriver::Mysql => list_articles_mysql(mysql_pool(&*self.pool)?).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_article_sqlite(sqlite_pool(&*self.pool)?, id).await,
            DatabaseDriver::Mysql => get_article_mysql(mysql_pool(&*self.pool)?, id).await,
        }
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE id = ?")
                    .bind(id)
                    .fetch_one(sqlite_pool(&*self.pool)?)
                    .await
            }
            DatabaseDriver::Mysql => {
                sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE id = ?")
                    .bind(id)
                    .fetch_one(mysql_pool(&*self.pool)?)
                    .await
            }
        }
        .context("Failed to check article existence")?;

        Ok(count > 0)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_article_sqlite(pool: &SqlitePool, input: &CreateArticleInput) -> Result<Article> {
    let date_published = input.date_published.unwrap_or_else(Utc::now);

    let result = sqlx::query(
        "INSERT INTO articles (title, content, author_id, date_published) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.author_id)
    .bind(date_published)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        content: input.content.clone(),
        author_id: input.author_id,
        date_published,
    })
}

async fn list_articles_sqlite(pool: &SqlitePool) -> Result<Vec<ArticleWithAuthor>> {
    let rows = sqlx::query(&format!("{} ORDER BY a.id ASC", SELECT_ARTICLE_WITH_AUTHOR))
        .fetch_all(pool)
        .await
        .context("Failed to list articles")?;

    rows.iter().map(row_to_article_sqlite).collect()
}

async fn get_article_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<ArticleWithAuthor>> {
    let row = sqlx::query(&format!("{} WHERE a.id = ?", SELECT_ARTICLE_WITH_AUTHOR))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get article by ID")?;

    row.as_ref().map(row_to_article_sqlite).transpose()
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<ArticleWithAuthor> {
    Ok(ArticleWithAuthor {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        date_published: row.try_get("date_published")?,
        number_of_comments: row.try_get("number_of_comments")?,
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

async fn create_article_mysql(pool: &MySqlPool, input: &CreateArticleInput) -> Result<Article> {
    let date_published = input.date_published.unwrap_or_else(Utc::now);

    let result = sqlx::query(
        "INSERT INTO articles (title, content, author_id, date_published) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.author_id)
    .bind(date_published)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_id() as i64,
        title: input.title.clone(),
        content: input.content.clone(),
        author_id: input.author_id,
        date_published,
    })
}

async fn list_articles_mysql(pool: &MySqlPool) -> Result<Vec<ArticleWithAuthor>> {
    let rows = sqlx::query(&format!("{} ORDER BY a.id ASC", SELECT_ARTICLE_WITH_AUTHOR))
        .fetch_all(pool)
        .await
        .context("Failed to list articles")?;

    rows.iter().map(row_to_article_mysql).collect()
}

async fn get_article_mysql(pool: &MySqlPool, id: i64) -> Result<Option<ArticleWithAuthor>> {
    let row = sqlx::query(&format!("{} WHERE a.id = ?", SELECT_ARTICLE_WITH_AUTHOR))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get article by ID")?;

    row.as_ref().map(row_to_article_mysql).transpose()
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<ArticleWithAuthor> {
    Ok(ArticleWithAuthor {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        date_published: row.try_get("date_published")?,
        number_of_comments: row.try_get("number_of_comments")?,
        author: Author {
            id: row.try_get("author_id")?,
            user_name: row.try_get("author_user_name")?,
            full_name: row.try_get("author_full_name")?,
            nickname: row.try_get("author_nickname")?,
            date_created: row.try_get("author_date_created")?,
        },
    })
}
