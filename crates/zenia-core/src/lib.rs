// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Zenia memory engine.
//!
//! This crate provides the error type, the memory record model, and the two
//! adapter seams (storage and embedding) that the rest of the workspace
//! plugs into.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ZeniaError;
pub use types::{AdapterType, HealthStatus, MemoryRecord, RecordKind};

pub use traits::{EmbeddingAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_render() {
        let cases: Vec<(ZeniaError, &str)> = vec![
            (ZeniaError::Config("bad".into()), "configuration error: bad"),
            (
                ZeniaError::StoreUnavailable("locked".into()),
                "store unavailable: locked",
            ),
            (
                ZeniaError::ProviderUnavailable("no model".into()),
                "embedding provider unavailable: no model",
            ),
            (ZeniaError::embedding("nan"), "embedding failed: nan"),
            (
                ZeniaError::DimensionMismatch {
                    expected: 384,
                    actual: 512,
                },
                "embedding dimension mismatch: expected 384, got 512",
            ),
            (ZeniaError::Internal("x".into()), "internal error: x"),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }

        let storage = ZeniaError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert!(storage.to_string().contains("disk full"));
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Storage, AdapterType::Embedding] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_embedding_adapter<T: EmbeddingAdapter>() {}
    }
}
