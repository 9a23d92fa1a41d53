//! Database layer
//!
//! This module provides database abstraction for the blog API.
//! It supports:
//! - SQLite (default, also used in-memory by the test suite)
//! - MySQL
//!
//! The database driver is selected based on configuration.
//!
//! # Usage
//!
//! ```ignore
//! use blogful::config::DatabaseConfig;
//! use blogful::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, is_unique_violation, mysql_pool, sqlite_pool, DatabasePool,
    DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
