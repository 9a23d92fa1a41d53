//! Article API endpoints
//!
//! - GET /api/articles - List all articles
//! - GET /api/articles/{id} - Get one article (Basic auth)
//! - GET /api/articles/{id}/comments - List an article's comments

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::error::ApiError;
use crate::api::middleware::AppState;
use crate::models::{ArticleWithAuthor, CommentWithAuthor};

/// GET /api/articles
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleWithAuthor>>, ApiError> {
    let articles = state.article_service.list().await?;
    Ok(Json(articles))
}

/// GET /api/articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleWithAuthor>, ApiError> {
    let article = state.article_service.get(id).await?;
    Ok(Json(article))
}

/// GET /api/articles/{id}/comments
pub async fn list_article_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CommentWithAuthor>>, ApiError> {
    let comments = state.comment_service.list_for_article(id).await?;
    Ok(Json(comments))
}
