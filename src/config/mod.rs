//! Configuration module for the journal backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! GitHub credentials are not configuration: they live in local storage and are
//! edited through the admin API.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Password for the admin API (unset disables the gate)
    pub admin_password: Option<String>,
    /// Path to the SQLite file backing local storage
    pub db_path: PathBuf,
    /// URL the published `posts.json` is read from
    pub posts_url: String,
    /// Base URL of the GitHub REST API
    pub github_api: String,
    /// Repository path of the published document
    pub posts_path: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_password = env::var("JOURNAL_ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty());

        let db_path = env::var("JOURNAL_DB_PATH")
            .unwrap_or_else(|_| "./data/journal.sqlite".to_string())
            .into();

        let posts_url = env::var("JOURNAL_POSTS_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:4000/posts.json".to_string());

        let github_api = env::var("JOURNAL_GITHUB_API")
            .unwrap_or_else(|_| "https://api.github.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let posts_path =
            env::var("JOURNAL_POSTS_PATH").unwrap_or_else(|_| "posts.json".to_string());

        let bind_addr = env::var("JOURNAL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid JOURNAL_BIND_ADDR format");

        let log_level = env::var("JOURNAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            admin_password,
            db_path,
            posts_url,
            github_api,
            posts_path,
            bind_addr,
            log_level,
        }
    }
}
