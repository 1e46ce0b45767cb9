// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for Zenia memory records.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and a
//! single-writer concurrency model via `tokio-rusqlite`, plus a volatile
//! in-process store used when the database cannot be opened.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod volatile;

use std::sync::Arc;

use tracing::{info, warn};
use zenia_config::model::{StorageBackend, StorageConfig};
use zenia_core::StorageAdapter;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use volatile::InMemoryStorage;

/// Open the configured store, initialized and ready for use.
///
/// Never fails: when the durable store cannot be opened the error is logged
/// and an [`InMemoryStorage`] is returned instead.
pub async fn open_store(config: &StorageConfig) -> Arc<dyn StorageAdapter> {
    match config.backend {
        StorageBackend::Memory => {
            info!("using in-memory store, records will not persist");
            Arc::new(InMemoryStorage::new())
        }
        StorageBackend::Sqlite => {
            let storage = SqliteStorage::new(config.clone());
            match storage.initialize().await {
                Ok(()) => Arc::new(storage),
                Err(e) => {
                    warn!(
                        error = %e,
                        path = %config.database_path,
                        "durable store unavailable, falling back to in-memory store"
                    );
                    Arc::new(InMemoryStorage::new())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_store_returns_durable_sqlite() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            database_path: dir.path().join("zenia.db").to_str().unwrap().to_string(),
            wal_mode: true,
        };
        let store = open_store(&config).await;
        assert!(store.is_durable());
        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn open_store_memory_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            database_path: String::new(),
            wal_mode: false,
        };
        let store = open_store(&config).await;
        assert!(!store.is_durable());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn open_store_falls_back_when_sqlite_cannot_open() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            database_path: blocker.join("zenia.db").to_str().unwrap().to_string(),
            wal_mode: true,
        };

        let store = open_store(&config).await;
        assert!(!store.is_durable());
        assert_eq!(store.name(), "in-memory");
        assert!(logs_contain("falling back to in-memory store"));
    }
}
