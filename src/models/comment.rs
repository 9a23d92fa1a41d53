//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub article_id: i64,
    pub user_id: i64,
    pub date_commented: DateTime<Utc>,
}

/// Comment as served by the API, with the author resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub text: String,
    pub article_id: i64,
    pub date_commented: DateTime<Utc>,
    pub author: Author,
}

/// Input for creating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    pub article_id: i64,
    pub user_id: i64,
    pub text: String,
}
