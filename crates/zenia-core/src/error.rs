// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Zenia memory engine.

use thiserror::Error;

/// The primary error type used across all Zenia adapter traits and core operations.
///
/// None of these reach the conversational dispatcher: the memory manager
/// handles them locally and degrades to "no memory match".
#[derive(Debug, Error)]
pub enum ZeniaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The durable backing store could not be opened.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The embedding model failed to load or is not supported on this host.
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Computing an embedding for a single text failed.
    #[error("embedding failed: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored vector's length disagrees with the current provider output.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A dataset could not be fetched or parsed.
    #[error("import error: {message}")]
    Import {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ZeniaError {
    /// Shorthand for an embedding failure without an underlying source.
    pub fn embedding(message: impl Into<String>) -> Self {
        ZeniaError::Embedding {
            message: message.into(),
            source: None,
        }
    }
}
