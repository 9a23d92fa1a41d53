//! API error type
//!
//! Every failure leaves the API as `{ "error": "<message>" }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{ArticleServiceError, CommentServiceError, UserServiceError};

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No `Authorization: Basic ...` header
    #[error("Missing basic token")]
    AuthMissing,

    /// Malformed credentials, unknown user or wrong password
    #[error("Unauthorized request")]
    AuthInvalid,

    #[error("Article doesn't exist")]
    ArticleNotFound,

    #[error("Comment doesn't exist")]
    CommentNotFound,

    #[error("{0}")]
    BadRequest(String),

    /// Logged when rendered; the cause never reaches the client
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn missing_field(field: &str) -> Self {
        Self::BadRequest(format!("Missing '{}' in request body", field))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::AuthMissing | Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::ArticleNotFound | Self::CommentNotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(cause) = &self {
            tracing::error!(error = ?cause, "request failed");
        }

        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<ArticleServiceError> for ApiError {
    fn from(err: ArticleServiceError) -> Self {
        match err {
            ArticleServiceError::NotFound(_) => Self::ArticleNotFound,
            ArticleServiceError::ValidationError(msg) => Self::BadRequest(msg),
            ArticleServiceError::InternalError(cause) => Self::Internal(cause),
        }
    }
}

impl From<CommentServiceError> for ApiError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::ArticleNotFound(_) => Self::ArticleNotFound,
            CommentServiceError::CommentNotFound(_) => Self::CommentNotFound,
            CommentServiceError::ValidationError(msg) => Self::BadRequest(msg),
            CommentServiceError::InternalError(cause) => Self::Internal(cause),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::AuthenticationError => Self::AuthInvalid,
            UserServiceError::ValidationError(msg) => Self::BadRequest(msg),
            UserServiceError::UserExists(name) => {
                Self::BadRequest(format!("User '{}' already exists", name))
            }
            UserServiceError::InternalError(cause) => Self::Internal(cause),
        }
    }
}
