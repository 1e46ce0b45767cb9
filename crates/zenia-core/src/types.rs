// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Zenia memory engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Embedding,
}

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Texts to embed, one vector is produced per entry.
    pub texts: Vec<String>,
}

impl EmbeddingInput {
    /// Input for a single text.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
        }
    }
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One vector per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Dimensionality of every vector in `embeddings`.
    pub dimensions: usize,
}

/// Kind tag of a memory record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A question/answer pair.
    #[default]
    Qa,
}

/// A single remembered interaction.
///
/// Records are immutable after creation, except that a missing `embedding`
/// may be filled in once by the startup repair pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier, time-based with a random suffix.
    pub id: String,
    /// Record type tag.
    pub kind: RecordKind,
    /// The user's question (already truncated).
    pub question: String,
    /// The remembered answer (already truncated).
    pub answer: String,
    /// Sentence embedding of `question`; `None` when no provider was ready.
    pub embedding: Option<Vec<f32>>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

impl MemoryRecord {
    /// Returns a copy of this record carrying `embedding`, all other fields untouched.
    pub fn with_embedding(&self, embedding: Vec<f32>) -> Self {
        Self {
            embedding: Some(embedding),
            ..self.clone()
        }
    }

    /// Length of the stored embedding, if any.
    pub fn embedding_dim(&self) -> Option<usize> {
        self.embedding.as_ref().map(Vec::len)
    }
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector. Trailing bytes are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
