//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They own
//! the not-found and credential rules and sanitize text on the way out.

pub mod article;
pub mod comment;
pub mod password;
pub mod sanitize;
pub mod user;

pub use article::{ArticleService, ArticleServiceError};
pub use comment::{CommentService, CommentServiceError};
pub use password::{hash_password, verify_password};
pub use sanitize::sanitize_html;
pub use user::{UserService, UserServiceError};
