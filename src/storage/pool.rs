//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled for concurrent access
//! - Automatic database file (and parent directory) creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::error_handling::DatabaseError;

/// Initializes and returns a database connection pool for `db_path`.
///
/// Creates the database file if it doesn't exist and enables WAL mode so
/// concurrent discovery runs can persist without blocking readers.
///
/// # Errors
///
/// `DatabaseError::FileCreationError` if the file cannot be created,
/// `DatabaseError::SqlError` if connecting or configuring fails.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<Arc<Pool<Sqlite>>, DatabaseError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            error!("Failed to create database directory {}: {e}", parent.display());
            DatabaseError::FileCreationError(e.to_string())
        })?;
    }

    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            DatabaseError::SqlError(e)
        })?;

    Ok(Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_file_and_enables_wal() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("discovery.db");

        let pool = init_db_pool_with_path(&path).await.expect("pool");
        assert!(path.exists());

        let mode: String = sqlx::query("PRAGMA journal_mode")
            .fetch_one(pool.as_ref())
            .await
            .expect("pragma")
            .get(0);
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_existing_file_is_reused() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("discovery.db");
        drop(init_db_pool_with_path(&path).await.expect("first"));
        assert!(init_db_pool_with_path(&path).await.is_ok());
    }
}
