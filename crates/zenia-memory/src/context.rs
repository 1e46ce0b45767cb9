// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application root owning the store, the provider and the manager.

use std::sync::Arc;

use tracing::{info, warn};

use zenia_config::ZeniaConfig;
use zenia_config::model::MemoryConfig;
use zenia_core::StorageAdapter;

use crate::importer::DatasetImporter;
use crate::manager::{MemoryManager, RepairSummary};
use crate::provider::EmbeddingProvider;

/// One memory stack per process, passed by reference to whoever needs it.
pub struct MemoryContext {
    pub store: Arc<dyn StorageAdapter>,
    pub provider: Arc<EmbeddingProvider>,
    pub manager: Arc<MemoryManager>,
    /// Outcome of the startup embedding repair.
    pub repair: RepairSummary,
}

impl MemoryContext {
    /// Startup sequence: open the store, load the model, backfill embeddings.
    pub async fn bootstrap(config: &ZeniaConfig) -> Self {
        let store = zenia_storage::open_store(&config.storage).await;
        let provider = Arc::new(EmbeddingProvider::from_config(&config.memory));
        Self::assemble(store, provider, &config.memory).await
    }

    /// Same sequence as [`bootstrap`](Self::bootstrap) with caller-built parts.
    pub async fn assemble(
        store: Arc<dyn StorageAdapter>,
        provider: Arc<EmbeddingProvider>,
        config: &MemoryConfig,
    ) -> Self {
        provider.initialize().await;
        let manager = Arc::new(MemoryManager::new(store.clone(), provider.clone(), config));
        let repair = manager.ensure_embeddings_for_all().await;

        info!(
            store = store.name(),
            durable = store.is_durable(),
            embeddings = provider.is_ready(),
            records = manager.count().await.unwrap_or_default(),
            "memory ready"
        );

        Self {
            store,
            provider,
            manager,
            repair,
        }
    }

    pub fn importer(&self) -> DatasetImporter {
        DatasetImporter::new(self.manager.clone())
    }

    /// Flush the store. Errors are logged.
    pub async fn shutdown(&self) {
        if let Err(e) = self.store.shutdown().await {
            warn!(error = %e, "store shutdown failed");
        }
    }
}
