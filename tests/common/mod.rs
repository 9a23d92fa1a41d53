//! Shared harness and fixtures for the HTTP tests.
//!
//! Every `TestApp` owns a fresh in-memory database with the fixture users
//! already seeded; articles and comments are seeded on demand.

#![allow(dead_code)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use blogful::api::{build_router, AppState};
use blogful::db::{create_test_pool, migrations};
use blogful::models::{
    Article, CommentWithAuthor, CreateArticleInput, CreateCommentInput, CreateUserInput, User,
};

/// A seeded user together with their plaintext password
pub struct TestUser {
    pub user: User,
    pub password: String,
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub users: Vec<TestUser>,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::from_pool(pool);

        let mut users = Vec::new();
        for input in make_users_array() {
            let password = input.password.clone();
            let user = state
                .user_service
                .create_user(input)
                .await
                .expect("Failed to seed user");
            users.push(TestUser { user, password });
        }

        let server = TestServer::new(build_router(state.clone(), "http://localhost:3000"))
            .expect("Failed to create test server");

        Self {
            server,
            state,
            users,
        }
    }

    /// Basic credentials of the n-th fixture user
    pub fn auth_for(&self, index: usize) -> HeaderValue {
        let test_user = &self.users[index];
        basic_auth(&test_user.user.user_name, &test_user.password)
    }

    pub async fn seed_articles(&self) -> Vec<Article> {
        let author_ids: Vec<i64> = self.users.iter().map(|u| u.user.id).collect();
        let mut articles = Vec::new();
        for input in make_articles_array(&author_ids) {
            articles.push(
                self.state
                    .article_service
                    .create(input)
                    .await
                    .expect("Failed to seed article"),
            );
        }
        articles
    }

    pub async fn seed_comments(&self, articles: &[Article]) -> Vec<CommentWithAuthor> {
        let user_ids: Vec<i64> = self.users.iter().map(|u| u.user.id).collect();
        let mut comments = Vec::new();
        for input in make_comments_array(&user_ids, articles) {
            comments.push(
                self.state
                    .comment_service
                    .create(input)
                    .await
                    .expect("Failed to seed comment"),
            );
        }
        comments
    }

    pub async fn seed_malicious_article(&self) -> Article {
        let (input, _) = make_malicious_article(self.users[0].user.id);
        self.state
            .article_service
            .create(input)
            .await
            .expect("Failed to seed malicious article")
    }
}

/// `Authorization` header value for a user name and password
pub fn basic_auth(user_name: &str, password: &str) -> HeaderValue {
    let token = STANDARD.encode(format!("{}:{}", user_name, password));
    HeaderValue::from_str(&format!("Basic {}", token)).expect("Invalid header value")
}

pub fn make_users_array() -> Vec<CreateUserInput> {
    vec![
        CreateUserInput {
            user_name: "dunder".to_string(),
            full_name: "Dunder Mifflin".to_string(),
            nickname: None,
            password: "password".to_string(),
        },
        CreateUserInput {
            user_name: "b.deboop".to_string(),
            full_name: "Bodeep Deboop".to_string(),
            nickname: Some("Bo".to_string()),
            password: "bo-password".to_string(),
        },
        CreateUserInput {
            user_name: "c.bloggs".to_string(),
            full_name: "Charlie Bloggs".to_string(),
            nickname: Some("Charlie".to_string()),
            password: "charlie-password".to_string(),
        },
        CreateUserInput {
            user_name: "s.smith".to_string(),
            full_name: "Sam Smith".to_string(),
            nickname: Some("Sam".to_string()),
            password: "sam-password".to_string(),
        },
    ]
}

pub fn make_articles_array(author_ids: &[i64]) -> Vec<CreateArticleInput> {
    let titles = ["First post!", "Second post!", "Third post!", "Fourth post!"];
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| CreateArticleInput {
            title: title.to_string(),
            content: format!("Lorem ipsum dolor sit amet, article number {}.", i + 1),
            author_id: author_ids[i % author_ids.len()],
            date_published: None,
        })
        .collect()
}

/// Seven comments spread over the first three articles; the last article
/// has none.
pub fn make_comments_array(user_ids: &[i64], articles: &[Article]) -> Vec<CreateCommentInput> {
    let layout = [
        (0, 0, "First comment!"),
        (0, 1, "Second comment!"),
        (0, 2, "Third comment!"),
        (1, 3, "Fourth comment!"),
        (1, 0, "Fifth comment!"),
        (2, 1, "Sixth comment!"),
        (2, 2, "Seventh comment!"),
    ];
    layout.iter()
        .map(|&(article, user, text)| CreateCommentInput {
            article_id: articles[article].id,
            user_id: user_ids[user],
            text: text.to_string(),
        })
        .collect()
}

/// Article with hostile markup, and the same article as it must be served
pub fn make_malicious_article(author_id: i64) -> (CreateArticleInput, (String, String)) {
    let malicious = CreateArticleInput {
        title: r#"Naughty naughty very naughty <script>alert("xss");</script>"#.to_string(),
        content: r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#.to_string(),
        author_id,
        date_published: None,
    };
    let expected = (
        r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#.to_string(),
        r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#.to_string(),
    );
    (malicious, expected)
}
