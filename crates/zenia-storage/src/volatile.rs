// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process storage used when the durable store cannot be opened.
//!
//! Contents are lost when the process exits.

use async_trait::async_trait;
use tokio::sync::RwLock;

use zenia_core::{
    AdapterType, HealthStatus, MemoryRecord, PluginAdapter, StorageAdapter, ZeniaError,
};

/// Volatile [`StorageAdapter`] keeping records in insertion order.
#[derive(Default)]
pub struct InMemoryStorage {
    records: RwLock<Vec<MemoryRecord>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for InMemoryStorage {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ZeniaError> {
        Ok(HealthStatus::Degraded("records are not persisted".into()))
    }
}

#[async_trait]
impl StorageAdapter for InMemoryStorage {
    async fn initialize(&self) -> Result<(), ZeniaError> {
        Ok(())
    }

    async fn put(&self, record: &MemoryRecord) -> Result<(), ZeniaError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<MemoryRecord>, ZeniaError> {
        Ok(self.records.read().await.clone())
    }

    async fn clear(&self) -> Result<(), ZeniaError> {
        self.records.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, ZeniaError> {
        Ok(self.records.read().await.len())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
