// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter for deterministic testing.
//!
//! `MockEmbedder` implements `EmbeddingAdapter` without a model. Texts can be
//! pinned to exact vectors; any other text gets a hashed bag-of-words vector,
//! so identical wording always embeds identically.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use zenia_core::ZeniaError;
use zenia_core::traits::{EmbeddingAdapter, PluginAdapter};
use zenia_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// Default dimensionality of hashed vectors.
pub const MOCK_DIM: usize = 16;

/// A deterministic embedder with pinned vectors and injectable failures.
pub struct MockEmbedder {
    dimensions: usize,
    pinned: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::with_dimensions(MOCK_DIM)
    }

    /// Hashed vectors get `dimensions` components.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            pinned: HashMap::new(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Embed `text` as exactly `vector`.
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.pinned.insert(text.to_string(), vector);
        self
    }

    /// Fail whenever `text` is embedded.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    /// Number of texts embedded so far, failures included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Result<Vec<f32>, ZeniaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(text) {
            return Err(ZeniaError::embedding(format!("mock failure for {text:?}")));
        }
        if let Some(vector) = self.pinned.get(text) {
            return Ok(vector.clone());
        }
        Ok(self.hashed(text))
    }

    fn hashed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        if self.dimensions == 0 {
            return vector;
        }
        let lower = text.to_lowercase();
        for token in lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            // FNV-1a keeps buckets stable across runs and platforms.
            let hash = token.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
                (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            });
            let bucket = usize::try_from(hash % self.dimensions as u64).unwrap_or_default();
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, ZeniaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, ZeniaError> {
        let embeddings = input
            .texts
            .iter()
            .map(|text| self.vector_for(text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EmbeddingOutput {
            dimensions: embeddings.first().map(Vec::len).unwrap_or(self.dimensions),
            embeddings,
        })
    }
}
