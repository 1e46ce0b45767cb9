// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as numeric ranges and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::{StorageBackend, ZeniaConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ZeniaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.database_path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let threshold = config.memory.similarity_threshold;
    if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.similarity_threshold must be within [-1, 1], got {threshold}"
            ),
        });
    }

    if config.memory.top_k == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.top_k must be at least 1".to_string(),
        });
    }

    if config.memory.max_question_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.max_question_chars must be at least 1".to_string(),
        });
    }

    if config.memory.max_answer_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.max_answer_chars must be at least 1".to_string(),
        });
    }

    if config.memory.model_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "memory.model_name must not be empty".to_string(),
        });
    }

    for (i, source) in config.datasets.sources.iter().enumerate() {
        if source.location.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("datasets.sources[{i}].location must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
