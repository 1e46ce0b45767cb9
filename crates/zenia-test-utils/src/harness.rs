// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end memory tests.
//!
//! `TestHarness` assembles a complete [`MemoryContext`] on a temporary SQLite
//! database, with either a [`MockEmbedder`] or no embeddings at all. The
//! database outlives [`TestHarness::restart`], which rebuilds the stack the
//! way a new process would.

use std::sync::Arc;

use zenia_config::model::{MemoryConfig, StorageBackend, StorageConfig};
use zenia_core::ZeniaError;
use zenia_memory::{EmbeddingProvider, MemoryContext, MemoryManager};

use crate::mock_embedder::MockEmbedder;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    embedder: Option<MockEmbedder>,
    memory: MemoryConfig,
    backend: StorageBackend,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            embedder: None,
            memory: MemoryConfig {
                embeddings_enabled: false,
                ..MemoryConfig::default()
            },
            backend: StorageBackend::Sqlite,
        }
    }

    /// Make the embedding provider ready with `embedder`.
    pub fn with_embedder(mut self, embedder: MockEmbedder) -> Self {
        self.embedder = Some(embedder);
        self.memory.embeddings_enabled = true;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.memory.similarity_threshold = threshold;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.memory.top_k = top_k;
        self
    }

    pub fn with_limits(mut self, max_question_chars: usize, max_answer_chars: usize) -> Self {
        self.memory.max_question_chars = max_question_chars;
        self.memory.max_answer_chars = max_answer_chars;
        self
    }

    /// Use the volatile in-process store instead of SQLite.
    pub fn ephemeral(mut self) -> Self {
        self.backend = StorageBackend::Memory;
        self
    }

    /// Build the harness, creating the temp database and running the startup sequence.
    pub async fn build(self) -> Result<TestHarness, ZeniaError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| ZeniaError::Storage {
            source: Box::new(e),
        })?;
        let storage = StorageConfig {
            backend: self.backend,
            database_path: temp_dir.path().join("test.db").to_string_lossy().to_string(),
            wal_mode: true,
        };
        let embedder = self.embedder.map(Arc::new);
        let context = assemble(&storage, &self.memory, embedder.clone()).await;

        Ok(TestHarness {
            context,
            embedder,
            storage,
            memory: self.memory,
            _temp_dir: temp_dir,
        })
    }
}

async fn assemble(
    storage: &StorageConfig,
    memory: &MemoryConfig,
    embedder: Option<Arc<MockEmbedder>>,
) -> MemoryContext {
    let store = zenia_storage::open_store(storage).await;
    let provider = match embedder {
        Some(embedder) => EmbeddingProvider::ready(embedder),
        None => EmbeddingProvider::disabled(),
    };
    MemoryContext::assemble(store, Arc::new(provider), memory).await
}

/// A complete memory stack on temp storage.
pub struct TestHarness {
    /// The assembled store, provider and manager.
    pub context: MemoryContext,
    /// The mock embedder, when embeddings are enabled.
    pub embedder: Option<Arc<MockEmbedder>>,
    /// Storage settings (temp database path).
    pub storage: StorageConfig,
    /// Memory settings the manager was built with.
    pub memory: MemoryConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn manager(&self) -> &Arc<MemoryManager> {
        &self.context.manager
    }

    /// Rebuild the stack over the same database, as a new process would.
    ///
    /// `embedder` decides whether the provider is ready after the restart.
    pub async fn restart(&mut self, embedder: Option<MockEmbedder>) {
        self.context.shutdown().await;
        self.embedder = embedder.map(Arc::new);
        self.memory.embeddings_enabled = self.embedder.is_some();
        self.context = assemble(&self.storage, &self.memory, self.embedder.clone()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_harness_is_lexical_and_durable() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.context.store.is_durable());
        assert!(!harness.context.provider.is_ready());
        assert!(harness.embedder.is_none());
    }

    #[tokio::test]
    async fn ephemeral_harness_uses_volatile_store() {
        let harness = TestHarness::builder().ephemeral().build().await.unwrap();
        assert!(!harness.context.store.is_durable());
    }

    #[tokio::test]
    async fn restart_keeps_records() {
        let mut harness = TestHarness::builder().build().await.unwrap();
        harness.manager().record("q", "a").await;
        harness.restart(Some(MockEmbedder::new())).await;

        assert!(harness.context.provider.is_ready());
        assert_eq!(harness.manager().count().await.unwrap(), 1);
        assert_eq!(harness.context.repair.repaired, 1);
    }
}
