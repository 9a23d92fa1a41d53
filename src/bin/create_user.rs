//! CLI tool to provision a user.
//!
//! Usage: `blogful-user <config> <user_name> <full_name> <password> [nickname]`
//!
//! Uses the same configuration (including `BLOGFUL_*` overrides) and
//! migrations as the server, so it can run against a fresh database.

use anyhow::{bail, Result};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogful::{
    config::Config,
    db::{self, repositories::SqlxUserRepository},
    models::CreateUserInput,
    services::UserService,
};

const USAGE: &str = "usage: blogful-user <config> <user_name> <full_name> <password> [nickname]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blogful=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, input) = match args.as_slice() {
        [config, user_name, full_name, password, rest @ ..] if rest.len() <= 1 => (
            config,
            CreateUserInput {
                user_name: user_name.clone(),
                full_name: full_name.clone(),
                nickname: rest.first().cloned(),
                password: password.clone(),
            },
        ),
        _ => bail!(USAGE),
    };

    let config = Config::load_with_env(Path::new(config_path))?;
    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;

    let service = UserService::new(SqlxUserRepository::boxed(pool.clone()));
    let user = service.create_user(input).await?;

    println!("Created user '{}' with id {}", user.user_name, user.id);
    pool.close().await;
    Ok(())
}
