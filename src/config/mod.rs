//! Configuration module for the site content service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::AppError;

/// Which storage strategy backs the content service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// SQLite key-value table on disk
    Sqlite,
    /// Process-local map, lost on restart
    Memory,
}

impl FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "memory" => Ok(BackendKind::Memory),
            other => Err(AppError::Config(format!(
                "Unknown SITE_BACKEND '{}' (expected 'sqlite' or 'memory')",
                other
            ))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Master password for the admin panel; login fails with 500 when unset
    pub master_password: Option<String>,
    /// Storage backend for the content document
    pub backend: BackendKind,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory
    pub index_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let master_password = env::var("SITE_MASTER_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty());

        let backend = env::var("SITE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .parse()?;

        let db_path = env::var("SITE_DB_PATH")
            .unwrap_or_else(|_| "./data/site.sqlite".to_string())
            .into();

        let index_path = env::var("SITE_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let bind_addr = env::var("SITE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid SITE_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("SITE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            master_password,
            backend,
            db_path,
            index_path,
            bind_addr,
            log_level,
        })
    }
}
