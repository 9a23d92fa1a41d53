//! User service
//!
//! Provisioning of users and the credential check behind Basic auth.

use crate::db::{is_unique_violation, repositories::UserRepository};
use crate::models::{CreateUserInput, User};
use crate::services::password::{hash_password, verify_against_dummy, verify_password};
use anyhow::Context;
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Unknown user name or wrong password
    #[error("Authentication failed")]
    AuthenticationError,

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User name already taken
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Create a user, hashing the supplied password before it is stored.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if user name, full name or password is empty
    /// - `UserExists` if the user name is taken
    /// - `InternalError` for hashing or database errors
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, UserServiceError> {
        validate_create_input(&input)?;

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task failed")??;
        let nickname = input.nickname.filter(|n| !n.trim().is_empty());
        let user = User::new(input.user_name, input.full_name, nickname, password_hash);

        // The UNIQUE constraint on user_name is the only duplicate check
        let result = self.user_repo.create(&user).await;
        let created = match result {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => {
                return Err(UserServiceError::UserExists(user.user_name));
            }
            Err(e) => return Err(e.context("Failed to create user").into()),
        };

        tracing::info!(user_id = created.id, user_name = %created.user_name, "user created");
        Ok(created)
    }

    /// Resolve a user from a Basic-auth user name and password.
    ///
    /// Unknown user names and wrong passwords both yield
    /// `AuthenticationError`, and both cost one Argon2 verification. The
    /// verification runs on the blocking pool so it never stalls other
    /// requests on the same worker.
    pub async fn authenticate(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<User, UserServiceError> {
        let user = self
            .user_repo
            .get_by_user_name(user_name)
            .await
            .context("Failed to look up user")?;

        let password = password.to_owned();
        let Some(user) = user else {
            tokio::task::spawn_blocking(move || verify_against_dummy(&password))
                .await
                .context("Password verification task failed")?;
            return Err(UserServiceError::AuthenticationError);
        };

        let stored = user.password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .context("Password verification task failed")??;

        if !matches {
            return Err(UserServiceError::AuthenticationError);
        }

        Ok(user)
    }
}

fn validate_create_input(input: &CreateUserInput) -> Result<(), UserServiceError> {
    if input.user_name.trim().is_empty() {
        return Err(UserServiceError::ValidationError(
            "User name cannot be empty".to_string(),
        ));
    }

    // The Basic-auth payload is split at the first ':'
    if input.user_name.contains(':') {
        return Err(UserServiceError::ValidationError(
            "User name cannot contain ':'".to_string(),
        ));
    }

    if input.full_name.trim().is_empty() {
        return Err(UserServiceError::ValidationError(
            "Full name cannot be empty".to_string(),
        ));
    }

    if input.password.is_empty() {
        return Err(UserServiceError::ValidationError(
            "Password cannot be empty".to_string(),
        ));
    }

    Ok(())
}
