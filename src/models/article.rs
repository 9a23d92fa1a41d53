//! Article model
//!
//! This module provides:
//! - `Article` entity mirroring a row of the `articles` table
//! - `ArticleWithAuthor`, the serialized form with the author resolved
//! - `CreateArticleInput` for inserts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Article title (may contain untrusted markup)
    pub title: String,
    /// Article body (may contain untrusted markup)
    pub content: String,
    /// Author user ID
    pub author_id: i64,
    /// Publication timestamp
    pub date_published: DateTime<Utc>,
}

/// Article as served by the API: author resolved, comment count attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleWithAuthor {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date_published: DateTime<Utc>,
    pub number_of_comments: i64,
    pub author: Author,
}

/// Input for creating an article
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleInput {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    /// Defaults to now when absent
    #[serde(default)]
    pub date_published: Option<DateTime<Utc>>,
}
