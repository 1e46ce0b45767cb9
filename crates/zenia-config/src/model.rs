// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Zenia.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Zenia configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZeniaConfig {
    /// Agent persona and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Memory record storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding and retrieval settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// External datasets used to seed memory.
    #[serde(default)]
    pub datasets: DatasetsConfig,
}

/// Agent persona configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Line printed when the shell starts.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Reply used when memory has no match for a question.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            greeting: default_greeting(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

fn default_agent_name() -> String {
    "zenia".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_greeting() -> String {
    "Olá, eu sou a Zenia. Como posso ajudar?".to_string()
}

fn default_fallback_reply() -> String {
    "Desculpa, ainda não sei responder a isso.".to_string()
}

/// Which backend holds memory records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite file, survives restarts. Falls back to `Memory` if it cannot be opened.
    #[default]
    Sqlite,
    /// In-process list, lost on exit.
    Memory,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Preferred backend.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("zenia").join("zenia.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("zenia.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Memory engine configuration.
///
/// The threshold and truncation bounds default to the values the engine has
/// always used; they are exposed only so deployments can tune them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Load the sentence-embedding model. When false, retrieval is lexical only.
    #[serde(default = "default_embeddings_enabled")]
    pub embeddings_enabled: bool,

    /// The top cosine score must be strictly above this to trust semantic retrieval.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Number of answers joined together on a confident semantic match.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Questions are cut to this many characters before storage.
    #[serde(default = "default_max_question_chars")]
    pub max_question_chars: usize,

    /// Answers are cut to this many characters before storage.
    #[serde(default = "default_max_answer_chars")]
    pub max_answer_chars: usize,

    /// Name of the embedding model to use.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Directory holding `model.onnx` and `tokenizer.json`.
    /// Defaults to `<data dir>/zenia/models/<model_name>`.
    #[serde(default)]
    pub model_dir: Option<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            embeddings_enabled: default_embeddings_enabled(),
            similarity_threshold: default_similarity_threshold(),
            top_k: default_top_k(),
            max_question_chars: default_max_question_chars(),
            max_answer_chars: default_max_answer_chars(),
            model_name: default_model_name(),
            model_dir: None,
        }
    }
}

fn default_embeddings_enabled() -> bool {
    true
}

fn default_similarity_threshold() -> f32 {
    0.55
}

fn default_top_k() -> usize {
    1
}

fn default_max_question_chars() -> usize {
    1000
}

fn default_max_answer_chars() -> usize {
    10_000
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

/// Layout of a seed dataset document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Squad,
    Coqa,
    Quac,
    PersonaChat,
    Reddit,
}

impl DatasetKind {
    /// Every supported dataset layout.
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::Squad,
        DatasetKind::Coqa,
        DatasetKind::Quac,
        DatasetKind::PersonaChat,
        DatasetKind::Reddit,
    ];

    /// Config/CLI spelling of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Squad => "squad",
            DatasetKind::Coqa => "coqa",
            DatasetKind::Quac => "quac",
            DatasetKind::PersonaChat => "persona_chat",
            DatasetKind::Reddit => "reddit",
        }
    }

    /// Parse the config/CLI spelling; `persona-chat` is accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|k| k.as_str() == normalized)
    }
}

/// A single dataset to import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSource {
    /// Document layout.
    pub kind: DatasetKind,
    /// Local path or http(s) URL.
    pub location: String,
}

/// Seed datasets configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetsConfig {
    /// Datasets imported by `zenia import --configured`.
    #[serde(default)]
    pub sources: Vec<DatasetSource>,
}
