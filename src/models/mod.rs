//! Data models
//!
//! This module contains the data structures shared by the repositories,
//! services and HTTP handlers:
//! - Database entities (User, Article, Comment)
//! - Serialized views with the author resolved (ArticleWithAuthor, CommentWithAuthor)
//! - Input types for inserts

mod article;
mod comment;
mod user;

pub use article::{Article, ArticleWithAuthor, CreateArticleInput};
pub use comment::{Comment, CommentWithAuthor, CreateCommentInput};
pub use user::{Author, CreateUserInput, User};
