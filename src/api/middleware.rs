//! API middleware
//!
//! Shared application state and the HTTP Basic authentication layer.
//! Every protected request carries its own credentials; nothing is cached
//! between requests.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::db::repositories::{SqlxArticleRepository, SqlxCommentRepository, SqlxUserRepository};
use crate::db::DynDatabasePool;
use crate::models::User;
use crate::services::{ArticleService, CommentService, UserService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub article_service: Arc<ArticleService>,
    pub comment_service: Arc<CommentService>,
}

impl AppState {
    /// Wire repositories and services over one shared pool
    pub fn from_pool(pool: DynDatabasePool) -> Self {
        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let article_repo = SqlxArticleRepository::boxed(pool.clone());
        let comment_repo = SqlxCommentRepository::boxed(pool);

        Self {
            user_service: Arc::new(UserService::new(user_repo)),
            article_service: Arc::new(ArticleService::new(article_repo.clone())),
            comment_service: Arc::new(CommentService::new(comment_repo, article_repo)),
        }
    }
}

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// User name and password decoded from an `Authorization: Basic` header
#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub user_name: String,
    pub password: String,
}

/// Decode the value of an `Authorization` header.
///
/// A scheme other than `Basic` counts as a missing token. The payload is
/// split at the first `:`, so passwords may contain colons; an empty user
/// name or password is rejected.
pub fn parse_basic_credentials(value: &str) -> Result<BasicCredentials, ApiError> {
    let value = value.trim();
    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));

    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(ApiError::AuthMissing);
    }

    let decoded = STANDARD
        .decode(token.trim())
        .map_err(|_| ApiError::AuthInvalid)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ApiError::AuthInvalid)?;

    let (user_name, password) = decoded.split_once(':').ok_or(ApiError::AuthInvalid)?;
    if user_name.is_empty() || password.is_empty() {
        return Err(ApiError::AuthInvalid);
    }

    Ok(BasicCredentials {
        user_name: user_name.to_string(),
        password: password.to_string(),
    })
}

/// Basic authentication middleware
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::AuthMissing)?
        .to_str()
        .map_err(|_| ApiError::AuthInvalid)?;

    let credentials = parse_basic_credentials(header_value).inspect_err(|e| {
        tracing::debug!(path = %request.uri().path(), "rejected credentials: {}", e);
    })?;

    let user = state
        .user_service
        .authenticate(&credentials.user_name, &credentials.password)
        .await
        .inspect_err(|_| {
            tracing::debug!(user_name = %credentials.user_name, "authentication failed");
        })?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn basic(payload: &str) -> String {
        format!("Basic {}", STANDARD.encode(payload))
    }

    #[test]
    fn test_parse_valid_credentials() {
        let creds = parse_basic_credentials(&basic("b.deboop:bo-password")).unwrap();

        assert_eq!(creds.user_name, "b.deboop");
        assert_eq!(creds.password, "bo-password");
    }

    #[test]
    fn test_password_may_contain_colons() {
        let creds = parse_basic_credentials(&basic("dunder:a:b:c")).unwrap();

        assert_eq!(creds.user_name, "dunder");
        assert_eq!(creds.password, "a:b:c");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let value = format!("basic {}", STANDARD.encode("dunder:password"));
        assert!(parse_basic_credentials(&value).is_ok());
    }

    #[test]
    fn test_other_scheme_is_missing_token() {
        assert!(matches!(
            parse_basic_credentials("Bearer abc.def"),
            Err(ApiError::AuthMissing)
        ));
        assert!(matches!(parse_basic_credentials(""), Err(ApiError::AuthMissing)));
    }

    #[test]
    fn test_malformed_payloads_are_unauthorized() {
        for value in [
            basic(":"),
            basic("dunder:"),
            basic(":password"),
            basic("no-colon"),
            "Basic".to_string(),
            "Basic !!!not-base64!!!".to_string(),
            format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x'])),
        ] {
            assert!(
                matches!(parse_basic_credentials(&value), Err(ApiError::AuthInvalid)),
                "{} should be rejected",
                value
            );
        }
    }

    proptest! {
        #[test]
        fn prop_encoded_credentials_parse_back(
            user_name in "[^:\\x00]{1,24}",
            password in "[^\\x00]{1,24}",
        ) {
            let value = basic(&format!("{}:{}", user_name, password));
            let creds = parse_basic_credentials(&value).unwrap();
            prop_assert_eq!(creds.user_name, user_name);
            prop_assert_eq!(creds.password, password);
        }

        #[test]
        fn prop_parser_never_panics(value in ".{0,64}") {
            let _ = parse_basic_credentials(&value);
        }
    }
}
