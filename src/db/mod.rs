//! Storage module for the site content document.
//!
//! The content service stores one JSON document under a fixed key. Storage is
//! a pluggable strategy: SQLite on disk, or an in-process map.

mod memory;
mod repository;
mod sqlite;

pub use memory::*;
pub use repository::*;
pub use sqlite::*;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::config::{BackendKind, Config};
use crate::errors::AppError;

/// Key under which the site content document is stored.
pub const CONTENT_KEY: &str = "site_content";

/// Key-value storage for JSON documents.
///
/// Backends do not validate documents; they store whatever was last written.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Load the document stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError>;

    /// Overwrite the document stored under `key`.
    async fn store(&self, key: &str, value: &Value) -> Result<(), AppError>;

    /// Store `value` only if nothing is stored under `key` yet, then return
    /// whatever is stored afterwards.
    async fn store_if_absent(&self, key: &str, value: &Value) -> Result<Value, AppError>;
}

/// Open the backend selected by the configuration.
pub async fn open_backend(config: &Config) -> Result<Arc<dyn ContentBackend>, AppError> {
    match config.backend {
        BackendKind::Sqlite => {
            let pool = init_database(&config.db_path).await?;
            Ok(Arc::new(SqliteBackend::new(pool)))
        }
        BackendKind::Memory => Ok(Arc::new(MemoryBackend::new())),
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
