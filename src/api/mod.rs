//! API layer - HTTP handlers and routing
//!
//! All endpoints live under `/api`. Fetching a single article and posting
//! a comment require Basic credentials; the listings are public.

pub mod articles;
pub mod comments;
pub mod error;
pub mod middleware;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{ApiError, ErrorBody};
pub use middleware::{AppState, AuthenticatedUser};

/// Build the API router (mounted under `/api` by [`build_router`])
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Protected routes (need Basic credentials)
    let protected_routes = Router::new()
        .route("/articles/{id}", get(articles::get_article))
        .route("/comments", post(comments::create_comment))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_basic_auth,
        ));

    // Public routes
    Router::new()
        .route("/articles", get(articles::list_articles))
        .route("/articles/{id}/comments", get(articles::list_article_comments))
        .route("/comments/{id}", get(comments::get_comment))
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::LOCATION]);

    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => tracing::warn!(
            cors_origin,
            "invalid CORS origin, cross-origin requests will be refused"
        ),
    }

    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
