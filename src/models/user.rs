//! User model
//!
//! Users author articles and comments and are the principals checked by the
//! Basic-Auth middleware.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Login name (unique)
    pub user_name: String,
    /// Display name
    pub full_name: String,
    /// Optional short name
    pub nickname: Option<String>,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    /// Creation timestamp
    pub date_created: DateTime<Utc>,
    /// Last update timestamp
    pub date_modified: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(
        user_name: String,
        full_name: String,
        nickname: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id: 0, // Will be set by the database
            user_name,
            full_name,
            nickname,
            password: password_hash,
            date_created: Utc::now(),
            date_modified: None,
        }
    }

    /// Public fields embedded in serialized articles and comments
    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            user_name: self.user_name.clone(),
            full_name: self.full_name.clone(),
            nickname: self.nickname.clone(),
            date_created: self.date_created,
        }
    }
}

/// Resolved author as it appears inside article and comment payloads.
///
/// Never carries the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub user_name: String,
    pub full_name: String,
    pub nickname: Option<String>,
    pub date_created: DateTime<Utc>,
}

/// Input for creating a user; the password is plaintext here
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub user_name: String,
    pub full_name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub password: String,
}
