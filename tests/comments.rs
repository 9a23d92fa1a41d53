//! Posting and reading comments

mod common;

use axum::http::{
    header::{AUTHORIZATION, LOCATION},
    StatusCode,
};
use blogful::api::ErrorBody;
use blogful::models::{ArticleWithAuthor, CommentWithAuthor};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_post_comment_without_auth() {
    let app = TestApp::new().await;
    let articles = app.seed_articles().await;

    let response = app
        .server
        .post("/api/comments")
        .json(&json!({ "article_id": articles[0].id, "text": "Hello" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(app
        .state
        .comment_service
        .list_for_article(articles[0].id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_post_comment_as_authenticated_user() {
    let app = TestApp::new().await;
    let articles = app.seed_articles().await;
    let article_id = articles[3].id;
    let poster = &app.users[3].user;

    let response = app
        .server
        .post("/api/comments")
        .add_header(AUTHORIZATION, app.auth_for(3))
        .json(&json!({ "article_id": article_id, "text": "Test new comment" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let comment = response.json::<CommentWithAuthor>();
    assert_eq!(comment.text, "Test new comment");
    assert_eq!(comment.article_id, article_id);
    assert_eq!(comment.author, poster.author());

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(location, Some(format!("/api/comments/{}", comment.id)));

    let listed = app
        .server
        .get(&format!("/api/articles/{}/comments", article_id))
        .await
        .json::<Vec<CommentWithAuthor>>();
    assert_eq!(listed, vec![comment.clone()]);

    let fetched = app
        .server
        .get(&format!("/api/comments/{}", comment.id))
        .await
        .json::<CommentWithAuthor>();
    assert_eq!(fetched, comment);
}

#[tokio::test]
async fn test_post_comment_updates_comment_count() {
    let app = TestApp::new().await;
    let articles = app.seed_articles().await;

    for text in ["one", "two"] {
        app.server
            .post("/api/comments")
            .add_header(AUTHORIZATION, app.auth_for(0))
            .json(&json!({ "article_id": articles[1].id, "text": text }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let listed = app.server.get("/api/articles").await.json::<Vec<ArticleWithAuthor>>();
    assert_eq!(listed[1].number_of_comments, 2);
    assert_eq!(listed[0].number_of_comments, 0);
}

#[tokio::test]
async fn test_post_comment_missing_fields() {
    let app = TestApp::new().await;
    let articles = app.seed_articles().await;

    let cases = [
        (json!({ "text": "orphan" }), "Missing 'article_id' in request body"),
        (json!({ "article_id": articles[0].id }), "Missing 'text' in request body"),
        (
            json!({ "article_id": articles[0].id, "text": "   " }),
            "Missing 'text' in request body",
        ),
    ];

    for (body, message) in cases {
        let response = app
            .server
            .post("/api/comments")
            .add_header(AUTHORIZATION, app.auth_for(1))
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, message);
    }
}

#[tokio::test]
async fn test_post_comment_invalid_json() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/comments")
        .add_header(AUTHORIZATION, app.auth_for(1))
        .text("{ not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(!response.json::<ErrorBody>().error.is_empty());
}

#[tokio::test]
async fn test_post_comment_on_missing_article() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/comments")
        .add_header(AUTHORIZATION, app.auth_for(2))
        .json(&json!({ "article_id": 123456, "text": "Anyone here?" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<ErrorBody>().error, "Article doesn't exist");
}

#[tokio::test]
async fn test_malicious_comment_is_sanitized() {
    let app = TestApp::new().await;
    let articles = app.seed_articles().await;

    let response = app
        .server
        .post("/api/comments")
        .add_header(AUTHORIZATION, app.auth_for(0))
        .json(&json!({
            "article_id": articles[0].id,
            "text": r#"<a href="javascript:alert(1)" onclick="steal()">click</a> <script>x</script>"#
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<CommentWithAuthor>().text,
        "<a>click</a> &lt;script&gt;x&lt;/script&gt;"
    );
}

#[tokio::test]
async fn test_get_missing_comment() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/comments/123456").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<ErrorBody>().error, "Comment doesn't exist");
}
