//! Comment API endpoints
//!
//! - POST /api/comments - Post a comment as the authenticated user
//! - GET /api/comments/{id} - Get one comment

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::middleware::{AppState, AuthenticatedUser};
use crate::models::{CommentWithAuthor, CreateCommentInput};

/// Request body for POST /api/comments. Fields are optional so a missing
/// one can be reported by name.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub article_id: Option<i64>,
    pub text: Option<String>,
}

/// POST /api/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let article_id = req
        .article_id
        .ok_or_else(|| ApiError::missing_field("article_id"))?;
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::missing_field("text"))?;

    let comment = state
        .comment_service
        .create(CreateCommentInput {
            article_id,
            user_id: user.id,
            text,
        })
        .await?;

    let location = format!("/api/comments/{}", comment.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(comment)))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CommentWithAuthor>, ApiError> {
    let comment = state.comment_service.get(id).await?;
    Ok(Json(comment))
}
