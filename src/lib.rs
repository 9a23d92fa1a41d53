//! Blogful - A small blog REST API
//!
//! Articles, comments and users on SQLite or MySQL, served over axum with
//! HTTP Basic authentication on the protected endpoints.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
