//! Comment service

use crate::db::repositories::{ArticleRepository, CommentRepository};
use crate::models::{CommentWithAuthor, CreateCommentInput};
use crate::services::sanitize::sanitize_html;
use anyhow::Context;
use std::sync::Arc;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// The referenced article does not exist
    #[error("Article not found: {0}")]
    ArticleNotFound(i64),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
    article_repo: Arc<dyn ArticleRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>, article_repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo, article_repo }
    }

    /// Comments on an article in insertion order, sanitized.
    ///
    /// An article without comments yields an empty list; a missing article
    /// is `ArticleNotFound`.
    pub async fn list_for_article(
        &self,
        article_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, CommentServiceError> {
        self.ensure_article_exists(article_id).await?;

        let comments = self
            .repo
            .list_by_article(article_id)
            .await
            .context("Failed to list comments")?;

        Ok(comments.into_iter().map(sanitized).collect())
    }

    /// Post a comment as `user_id` and return it with its author resolved.
    pub async fn create(
        &self,
        input: CreateCommentInput,
    ) -> Result<CommentWithAuthor, CommentServiceError> {
        if input.text.trim().is_empty() {
            return Err(CommentServiceError::ValidationError(
                "Comment text cannot be empty".to_string(),
            ));
        }

        self.ensure_article_exists(input.article_id).await?;

        let comment = self
            .repo
            .create(&input)
            .await
            .context("Failed to create comment")?;

        tracing::info!(
            comment_id = comment.id,
            article_id = comment.article_id,
            user_id = comment.user_id,
            "comment created"
        );

        let created = self
            .repo
            .get_by_id(comment.id)
            .await
            .context("Failed to load created comment")?
            .ok_or_else(|| anyhow::anyhow!("Comment {} vanished after insert", comment.id))?;

        Ok(sanitized(created))
    }

    /// A single sanitized comment
    pub async fn get(&self, id: i64) -> Result<CommentWithAuthor, CommentServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
            .map(sanitized)
            .ok_or(CommentServiceError::CommentNotFound(id))
    }

    async fn ensure_article_exists(&self, article_id: i64) -> Result<(), CommentServiceError> {
        let exists = self
            .article_repo
            .exists(article_id)
            .await
            .context("Failed to check article")?;

        if exists {
            Ok(())
        } else {
            Err(CommentServiceError::ArticleNotFound(article_id))
        }
    }
}

fn sanitized(mut comment: CommentWithAuthor) -> CommentWithAuthor {
    comment.text = sanitize_html(&comment.text);
    comment
}
