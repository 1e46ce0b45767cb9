// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use zenia_config::model::StorageConfig;
use zenia_core::{
    AdapterType, HealthStatus, MemoryRecord, PluginAdapter, StorageAdapter, ZeniaError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`StorageAdapter::initialize`]; every
/// other operation fails with [`ZeniaError::StoreUnavailable`] until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, ZeniaError> {
        self.db
            .get()
            .ok_or_else(|| ZeniaError::StoreUnavailable("sqlite store not initialized".into()))
    }

    async fn checkpoint(&self) -> Result<(), ZeniaError> {
        if let Some(db) = self.db.get()
            && self.config.wal_mode
        {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ZeniaError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ZeniaError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ZeniaError> {
        let path = &self.config.database_path;
        let wal_mode = self.config.wal_mode;
        self.db
            .get_or_try_init(|| Database::open(path, wal_mode))
            .await?;
        debug!(path = %path, "SQLite storage initialized");
        Ok(())
    }

    async fn put(&self, record: &MemoryRecord) -> Result<(), ZeniaError> {
        queries::records::upsert_record(self.db()?, record).await
    }

    async fn get_all(&self) -> Result<Vec<MemoryRecord>, ZeniaError> {
        queries::records::list_records(self.db()?).await
    }

    async fn clear(&self) -> Result<(), ZeniaError> {
        let removed = queries::records::delete_all_records(self.db()?).await?;
        debug!(removed, "memory records cleared");
        Ok(())
    }

    async fn count(&self) -> Result<usize, ZeniaError> {
        queries::records::count_records(self.db()?).await
    }

    fn is_durable(&self) -> bool {
        true
    }
}
