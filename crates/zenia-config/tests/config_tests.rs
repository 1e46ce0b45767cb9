// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Zenia configuration system.

use zenia_config::diagnostic::ConfigError;
use zenia_config::model::{DatasetKind, StorageBackend, ZeniaConfig};
use zenia_config::{load_and_validate_str, load_config, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_zenia_config() {
    let toml = r#"
[agent]
name = "zenia-test"
log_level = "debug"
greeting = "Olá!"
fallback_reply = "Não sei."

[storage]
backend = "sqlite"
database_path = "/tmp/zenia-test.db"
wal_mode = false

[memory]
embeddings_enabled = false
similarity_threshold = 0.6
top_k = 2
max_question_chars = 500
max_answer_chars = 5000
model_name = "all-MiniLM-L6-v2"
model_dir = "/opt/models/minilm"

[[datasets.sources]]
kind = "squad"
location = "/data/squad.json"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "zenia-test");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.greeting, "Olá!");
    assert_eq!(config.agent.fallback_reply, "Não sei.");
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.database_path, "/tmp/zenia-test.db");
    assert!(!config.storage.wal_mode);
    assert!(!config.memory.embeddings_enabled);
    assert!((config.memory.similarity_threshold - 0.6).abs() < f32::EPSILON);
    assert_eq!(config.memory.top_k, 2);
    assert_eq!(config.memory.max_question_chars, 500);
    assert_eq!(config.memory.max_answer_chars, 5000);
    assert_eq!(config.memory.model_dir.as_deref(), Some("/opt/models/minilm"));
    assert_eq!(config.datasets.sources.len(), 1);
    assert_eq!(config.datasets.sources[0].kind, DatasetKind::Squad);
}

/// Unknown field in [memory] is rejected rather than silently ignored.
#[test]
fn unknown_field_in_memory_produces_error() {
    let toml = r#"
[memory]
treshold = 0.7
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("treshold"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[theme]
dark = true
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// An empty file yields the compiled defaults.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "zenia");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(
        config.agent.fallback_reply,
        "Desculpa, ainda não sei responder a isso."
    );
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert!(config.storage.database_path.ends_with("zenia.db"));
    assert!(config.storage.wal_mode);
    assert!(config.memory.embeddings_enabled);
    assert!((config.memory.similarity_threshold - 0.55).abs() < f32::EPSILON);
    assert_eq!(config.memory.top_k, 1);
    assert_eq!(config.memory.max_question_chars, 1000);
    assert_eq!(config.memory.max_answer_chars, 10_000);
    assert!(config.datasets.sources.is_empty());
}

/// `ZENIA_*` variables and a local zenia.toml are layered over the defaults.
#[test]
fn env_vars_override_local_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "zenia.toml",
            r#"
[agent]
name = "from-file"

[memory]
top_k = 2
"#,
        )?;
        jail.set_env("ZENIA_MEMORY_TOP_K", "5");
        jail.set_env("ZENIA_MEMORY_SIMILARITY_THRESHOLD", "0.7");
        jail.set_env("ZENIA_STORAGE_BACKEND", "memory");

        let config = load_config()?;
        assert_eq!(config.agent.name, "from-file");
        assert_eq!(config.memory.top_k, 5);
        assert!((config.memory.similarity_threshold - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        Ok(())
    });
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: ZeniaConfig = Figment::new()
        .merge(Serialized::defaults(ZeniaConfig::default()))
        .merge(Toml::file("/nonexistent/path/zenia.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.agent.name, "zenia");
}

/// A typo in [memory] produces an UnknownKey diagnostic with a suggestion.
#[test]
fn diagnostic_suggests_correct_memory_key() {
    let toml = r#"
[memory]
similarity_treshold = 0.7
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should fail");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } if key == "similarity_treshold" => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("similarity_threshold"));
}

/// The UnknownKey diagnostic lists the valid keys of the section.
#[test]
fn diagnostic_error_includes_valid_keys() {
    let toml = r#"
[agent]
nmae = "x"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    let has_valid_keys = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { valid_keys, .. }
            if valid_keys.contains("name") && valid_keys.contains("fallback_reply"))
    });
    assert!(has_valid_keys, "error should list valid keys for [agent] section");
}

/// Wrong value type is reported as InvalidType.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[memory]
top_k = "three"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("top_k"))),
        "expected an InvalidType error for top_k, got: {rendered:?}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "tok_k".to_string(),
        suggestion: Some("top_k".to_string()),
        valid_keys: "embeddings_enabled, similarity_threshold, top_k".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `top_k`"), "got: {help}");

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("tok_k"));
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn validation_catches_out_of_range_threshold() {
    let toml = r#"
[memory]
similarity_threshold = 2.0
"#;

    let errors = load_and_validate_str(toml).expect_err("threshold 2.0 should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("similarity_threshold"))
    }));
}

/// A memory-only deployment may leave the database path empty.
#[test]
fn memory_backend_needs_no_database_path() {
    let toml = r#"
[storage]
backend = "memory"
database_path = ""
"#;

    let config = load_and_validate_str(toml).expect("memory backend should validate");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}
