//! Article service
//!
//! Articles are stored exactly as submitted; every read path runs the
//! title and content through the HTML sanitizer before handing the
//! article to a caller.

use crate::db::repositories::ArticleRepository;
use crate::models::{Article, ArticleWithAuthor, CreateArticleInput};
use crate::services::sanitize::sanitize_html;
use anyhow::Context;
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    /// Publish an article. Only used for seeding, the HTTP API is read-only.
    pub async fn create(&self, input: CreateArticleInput) -> Result<Article, ArticleServiceError> {
        if input.title.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }

        let article = self
            .repo
            .create(&input)
            .await
            .context("Failed to create article")?;

        tracing::debug!(article_id = article.id, "article created");
        Ok(article)
    }

    /// All articles in insertion order, sanitized
    pub async fn list(&self) -> Result<Vec<ArticleWithAuthor>, ArticleServiceError> {
        let articles = self.repo.list().await.context("Failed to list articles")?;
        Ok(articles.into_iter().map(sanitized).collect())
    }

    /// A single sanitized article
    ///
    /// # Errors
    ///
    /// `NotFound` if no article has this ID
    pub async fn get(&self, id: i64) -> Result<ArticleWithAuthor, ArticleServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?
            .map(sanitized)
            .ok_or(ArticleServiceError::NotFound(id))
    }
}

fn sanitized(mut article: ArticleWithAuthor) -> ArticleWithAuthor {
    article.title = sanitize_html(&article.title);
    article.content = sanitize_html(&article.content);
    article
}
