// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording and retrieval of question/answer memories.
//!
//! Retrieval tries the semantic path first and trusts it only when the best
//! cosine score is strictly above the configured threshold. Otherwise the
//! query falls through to lexical overlap against stored questions.
//!
//! None of the dispatcher-facing calls (`record`, `retrieve`,
//! `ensure_embeddings_for_all`) return errors: failures are logged and the
//! caller sees "no match".

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use zenia_config::model::MemoryConfig;
use zenia_core::{MemoryRecord, StorageAdapter, ZeniaError};

use crate::provider::EmbeddingProvider;
use crate::record::{TextLimits, new_qa_record};
use crate::similarity::{cosine_similarity, lexical_overlap_score};

/// Separator placed between answers when `top_k > 1`.
pub const ANSWER_SEPARATOR: &str = "\n\n";

const EVENT_CAPACITY: usize = 64;

/// Notification sent to observers of the memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryEvent {
    /// The number of stored records may have changed.
    /// `count` is `None` when the store could not be counted.
    CountChanged { count: Option<usize> },
}

/// Result of a startup embedding backfill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    /// Records inspected.
    pub scanned: usize,
    /// Records that gained an embedding.
    pub repaired: usize,
    /// Records whose embedding or write failed; left as they were.
    pub failed: usize,
}

/// Orchestrates the store, the embedding provider and the scoring functions.
pub struct MemoryManager {
    store: Arc<dyn StorageAdapter>,
    provider: Arc<EmbeddingProvider>,
    limits: TextLimits,
    similarity_threshold: f32,
    default_top_k: usize,
    events: broadcast::Sender<MemoryEvent>,
}

impl MemoryManager {
    pub fn new(
        store: Arc<dyn StorageAdapter>,
        provider: Arc<EmbeddingProvider>,
        config: &MemoryConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            provider,
            limits: TextLimits {
                max_question_chars: config.max_question_chars,
                max_answer_chars: config.max_answer_chars,
            },
            similarity_threshold: config.similarity_threshold,
            default_top_k: config.top_k,
            events,
        }
    }

    /// Receive a [`MemoryEvent`] after every record and clear.
    pub fn subscribe(&self) -> broadcast::Receiver<MemoryEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &Arc<dyn StorageAdapter> {
        &self.store
    }

    pub fn provider(&self) -> &Arc<EmbeddingProvider> {
        &self.provider
    }

    /// Store a new question/answer pair. Errors are logged, never returned.
    pub async fn record(&self, question: &str, answer: &str) {
        if let Err(e) = self.try_record(question, answer).await {
            warn!(error = %e, "failed to record memory");
        }
    }

    /// Store a new question/answer pair and return the stored record.
    ///
    /// The embedding is computed from the truncated question when the
    /// provider is ready; otherwise the record is stored without one.
    pub async fn try_record(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<MemoryRecord, ZeniaError> {
        let mut record = new_qa_record(question, answer, None, self.limits);
        record.embedding = self.provider.embed(&record.question).await;
        self.store.put(&record).await?;
        debug!(id = %record.id, embedded = record.embedding.is_some(), "memory recorded");
        self.notify_count().await;
        Ok(record)
    }

    /// Answer `query` from memory using `memory.top_k` answers.
    pub async fn retrieve_default(&self, query: &str) -> Option<String> {
        self.retrieve(query, self.default_top_k).await
    }

    /// Best remembered answer for `query`, or `None` when nothing matches.
    ///
    /// On a confident semantic match the answers of the `top_k` best records
    /// are joined with a blank line. `top_k` of 0 is treated as 1.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Option<String> {
        let records = self.records().await;
        if records.is_empty() {
            return None;
        }

        if self.provider.is_ready()
            && let Some(query_embedding) = self.provider.embed(query).await
            && let Some(answer) = self.semantic_match(&records, &query_embedding, top_k.max(1))
        {
            return Some(answer);
        }

        lexical_match(&records, query)
    }

    /// Fill in embeddings missing from stored records.
    ///
    /// No-op while the provider is unavailable. Records that already carry an
    /// embedding are left untouched, so repeated runs change nothing.
    pub async fn ensure_embeddings_for_all(&self) -> RepairSummary {
        let mut summary = RepairSummary::default();
        if !self.provider.is_ready() {
            return summary;
        }

        let records = self.records().await;
        summary.scanned = records.len();

        for record in records.iter().filter(|r| r.embedding.is_none()) {
            let embedding = match self.provider.try_embed(&record.question).await {
                Ok(v) => v,
                Err(e) => {
                    warn!(id = %record.id, error = %e, "skipping record during embedding repair");
                    summary.failed += 1;
                    continue;
                }
            };
            match self.store.put(&record.with_embedding(embedding)).await {
                Ok(()) => summary.repaired += 1,
                Err(e) => {
                    warn!(id = %record.id, error = %e, "failed to store repaired record");
                    summary.failed += 1;
                }
            }
        }

        if summary.repaired > 0 || summary.failed > 0 {
            info!(
                scanned = summary.scanned,
                repaired = summary.repaired,
                failed = summary.failed,
                "embedding repair finished"
            );
        }
        summary
    }

    /// Remove every record.
    pub async fn clear(&self) -> Result<(), ZeniaError> {
        self.store.clear().await?;
        info!("memory cleared");
        self.notify_count().await;
        Ok(())
    }

    pub async fn count(&self) -> Result<usize, ZeniaError> {
        self.store.count().await
    }

    /// Snapshot of every record; empty when the store cannot be read.
    pub async fn records(&self) -> Vec<MemoryRecord> {
        match self.store.get_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "failed to read memory records");
                Vec::new()
            }
        }
    }

    fn semantic_match(
        &self,
        records: &[MemoryRecord],
        query_embedding: &[f32],
        top_k: usize,
    ) -> Option<String> {
        let ranked = rank_by_similarity(records, query_embedding);
        let (top_score, _) = ranked.first()?;
        if *top_score <= self.similarity_threshold {
            debug!(top_score, threshold = self.similarity_threshold, "semantic match inconclusive");
            return None;
        }

        let answers: Vec<&str> = ranked
            .iter()
            .take(top_k)
            .map(|(_, record)| record.answer.as_str())
            .collect();
        Some(answers.join(ANSWER_SEPARATOR))
    }

    async fn notify_count(&self) {
        let count = match self.store.count().await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "failed to count memory records");
                None
            }
        };
        // No subscribers is fine.
        let _ = self.events.send(MemoryEvent::CountChanged { count });
    }
}

/// Records with a comparable embedding, best score first.
///
/// Records without an embedding or with a different dimensionality are
/// skipped. The sort is stable, so equal scores keep store order.
pub fn rank_by_similarity<'a>(
    records: &'a [MemoryRecord],
    query_embedding: &[f32],
) -> Vec<(f32, &'a MemoryRecord)> {
    let mut ranked: Vec<(f32, &MemoryRecord)> = records
        .iter()
        .filter_map(|record| {
            let embedding = record.embedding.as_deref()?;
            if embedding.len() != query_embedding.len() {
                let mismatch = ZeniaError::DimensionMismatch {
                    expected: query_embedding.len(),
                    actual: embedding.len(),
                };
                debug!(id = %record.id, error = %mismatch, "record excluded from semantic ranking");
                return None;
            }
            Some((cosine_similarity(query_embedding, embedding), record))
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
}

/// Answer of the record whose question shares the most tokens with `query`.
///
/// The first record wins ties. `None` when no token matches.
pub fn lexical_match(records: &[MemoryRecord], query: &str) -> Option<String> {
    let mut best: Option<(usize, &MemoryRecord)> = None;
    for record in records {
        let score = lexical_overlap_score(query, &record.question);
        if score > best.map_or(0, |(s, _)| s) {
            best = Some((score, record));
        }
    }
    best.map(|(_, record)| record.answer.clone())
}
