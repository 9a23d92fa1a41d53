//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the queries for one table.

pub mod article;
pub mod comment;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use user::{SqlxUserRepository, UserRepository};
