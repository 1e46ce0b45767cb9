// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seeding memory from public conversational datasets.
//!
//! Each document is a JSON file on disk or behind an http(s) URL. A document
//! that cannot be fetched or does not have the expected shape is logged and
//! contributes zero pairs.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use zenia_config::model::{DatasetKind, DatasetSource};
use zenia_core::ZeniaError;

use crate::manager::MemoryManager;

/// Outcome of importing one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub dataset: DatasetKind,
    /// Pairs successfully recorded.
    pub pairs: usize,
}

/// Records dataset pairs through a [`MemoryManager`].
pub struct DatasetImporter {
    manager: Arc<MemoryManager>,
    client: reqwest::Client,
}

impl DatasetImporter {
    pub fn new(manager: Arc<MemoryManager>) -> Self {
        Self {
            manager,
            client: reqwest::Client::new(),
        }
    }

    /// Import every configured source in order.
    pub async fn import_all(&self, sources: &[DatasetSource]) -> Vec<ImportSummary> {
        let mut summaries = Vec::with_capacity(sources.len());
        for source in sources {
            summaries.push(self.import(source.kind, &source.location).await);
        }
        summaries
    }

    /// Import one dataset document. Never fails; problems are logged.
    pub async fn import(&self, kind: DatasetKind, location: &str) -> ImportSummary {
        let pairs = match self.fetch(location).await.and_then(|doc| extract_pairs(kind, doc)) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(dataset = kind.as_str(), location, error = %e, "dataset import failed");
                return ImportSummary {
                    dataset: kind,
                    pairs: 0,
                };
            }
        };

        let mut recorded = 0;
        for (question, answer) in &pairs {
            match self.manager.try_record(question, answer).await {
                Ok(_) => recorded += 1,
                Err(e) => warn!(dataset = kind.as_str(), error = %e, "failed to record pair"),
            }
        }

        info!(dataset = kind.as_str(), pairs = recorded, "dataset imported");
        ImportSummary {
            dataset: kind,
            pairs: recorded,
        }
    }

    async fn fetch(&self, location: &str) -> Result<serde_json::Value, ZeniaError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let response = self
                .client
                .get(location)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| import_err(format!("failed to fetch {location}"), e))?;
            response
                .json()
                .await
                .map_err(|e| import_err(format!("invalid JSON from {location}"), e))
        } else {
            let text = tokio::fs::read_to_string(location)
                .await
                .map_err(|e| import_err(format!("failed to read {location}"), e))?;
            serde_json::from_str(&text)
                .map_err(|e| import_err(format!("invalid JSON in {location}"), e))
        }
    }
}

fn import_err(
    message: String,
    source: impl std::error::Error + Send + Sync + 'static,
) -> ZeniaError {
    ZeniaError::Import {
        message,
        source: Some(Box::new(source)),
    }
}

/// Question/answer pairs contained in a dataset document.
pub fn extract_pairs(
    kind: DatasetKind,
    doc: serde_json::Value,
) -> Result<Vec<(String, String)>, ZeniaError> {
    let shape_err =
        |e: serde_json::Error| import_err(format!("unexpected {} layout", kind.as_str()), e);
    let pairs = match kind {
        DatasetKind::Squad | DatasetKind::Quac => {
            let doc: ParagraphDoc = serde_json::from_value(doc).map_err(shape_err)?;
            doc.data
                .into_iter()
                .flat_map(|article| article.paragraphs)
                .flat_map(|paragraph| paragraph.qas)
                .filter_map(|qa| {
                    let answer = qa.answers.into_iter().next()?;
                    Some((qa.question, answer.text))
                })
                .collect()
        }
        DatasetKind::Coqa => {
            let doc: CoqaDoc = serde_json::from_value(doc).map_err(shape_err)?;
            doc.data
                .into_iter()
                .flat_map(|story| {
                    story
                        .questions
                        .into_iter()
                        .zip(story.answers)
                        .map(|(q, a)| (q.into_text(), a.into_text()))
                })
                .collect()
        }
        DatasetKind::PersonaChat => {
            let doc: PersonaDoc = serde_json::from_value(doc).map_err(shape_err)?;
            doc.utterances
                .into_iter()
                .filter_map(|utt| {
                    let question = utt.history.into_iter().last()?;
                    let answer = utt.candidates.into_iter().next()?;
                    Some((question, answer))
                })
                .collect()
        }
        DatasetKind::Reddit => {
            let doc: RedditDoc = serde_json::from_value(doc).map_err(shape_err)?;
            doc.conversations
                .iter()
                .flat_map(|turns| turns.windows(2).map(|w| (w[0].clone(), w[1].clone())))
                .collect()
        }
    };
    Ok(pairs)
}

/// SQuAD and QuAC share the article/paragraph/qas nesting.
#[derive(Deserialize)]
struct ParagraphDoc {
    data: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    #[serde(default)]
    paragraphs: Vec<Paragraph>,
}

#[derive(Deserialize)]
struct Paragraph {
    #[serde(default)]
    qas: Vec<Qa>,
}

#[derive(Deserialize)]
struct Qa {
    question: String,
    #[serde(default)]
    answers: Vec<SpanAnswer>,
}

#[derive(Deserialize)]
struct SpanAnswer {
    text: String,
}

#[derive(Deserialize)]
struct CoqaDoc {
    data: Vec<CoqaStory>,
}

#[derive(Deserialize)]
struct CoqaStory {
    #[serde(default)]
    questions: Vec<CoqaTurn>,
    #[serde(default)]
    answers: Vec<CoqaTurn>,
}

/// CoQA turns appear either as bare strings or as objects with `input_text`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CoqaTurn {
    Text(String),
    Object { input_text: String },
}

impl CoqaTurn {
    fn into_text(self) -> String {
        match self {
            CoqaTurn::Text(text) | CoqaTurn::Object { input_text: text } => text,
        }
    }
}

#[derive(Deserialize)]
struct PersonaDoc {
    #[serde(default)]
    utterances: Vec<PersonaUtterance>,
}

#[derive(Deserialize)]
struct PersonaUtterance {
    #[serde(default)]
    history: Vec<String>,
    #[serde(default)]
    candidates: Vec<String>,
}

#[derive(Deserialize)]
struct RedditDoc {
    conversations: Vec<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use zenia_config::model::MemoryConfig;
    use zenia_storage::InMemoryStorage;

    use crate::provider::EmbeddingProvider;

    fn importer() -> (DatasetImporter, Arc<MemoryManager>) {
        let manager = Arc::new(MemoryManager::new(
            Arc::new(InMemoryStorage::new()),
            Arc::new(EmbeddingProvider::disabled()),
            &MemoryConfig::default(),
        ));
        (DatasetImporter::new(manager.clone()), manager)
    }

    #[test]
    fn squad_takes_first_answer_and_skips_unanswered() {
        let doc = json!({
            "data": [{
                "paragraphs": [{
                    "qas": [
                        {"question": "Q1", "answers": [{"text": "A1"}, {"text": "other"}]},
                        {"question": "Q2", "answers": []}
                    ]
                }]
            }]
        });
        let pairs = extract_pairs(DatasetKind::Squad, doc).unwrap();
        assert_eq!(pairs, vec![("Q1".to_string(), "A1".to_string())]);
    }

    #[test]
    fn coqa_accepts_strings_and_objects() {
        let doc = json!({
            "data": [{
                "questions": ["Q1", {"input_text": "Q2", "turn_id": 2}],
                "answers": [{"input_text": "A1"}, "A2", "extra"]
            }]
        });
        let pairs = extract_pairs(DatasetKind::Coqa, doc).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("Q1".to_string(), "A1".to_string()),
                ("Q2".to_string(), "A2".to_string())
            ]
        );
    }

    #[test]
    fn persona_chat_uses_last_history_and_first_candidate() {
        let doc = json!({
            "utterances": [
                {"history": ["olá", "tudo bem?"], "candidates": ["sim", "não"]},
                {"history": [], "candidates": ["ignored"]},
                {"history": ["x"], "candidates": []}
            ]
        });
        let pairs = extract_pairs(DatasetKind::PersonaChat, doc).unwrap();
        assert_eq!(pairs, vec![("tudo bem?".to_string(), "sim".to_string())]);
    }

    #[test]
    fn reddit_pairs_consecutive_turns() {
        let doc = json!({"conversations": [["a", "b", "c"], ["solo"]]});
        let pairs = extract_pairs(DatasetKind::Reddit, doc).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string())
            ]
        );
    }

    #[test]
    fn wrong_shape_is_an_import_error() {
        let result = extract_pairs(DatasetKind::Reddit, json!({"data": []}));
        assert!(matches!(result, Err(ZeniaError::Import { .. })));
    }

    #[tokio::test]
    async fn import_from_file_records_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reddit.json");
        std::fs::write(&path, r#"{"conversations": [["qual o teu nome", "Chamo-me Zenia"]]}"#)
            .unwrap();

        let (importer, manager) = importer();
        let summary = importer
            .import(DatasetKind::Reddit, path.to_str().unwrap())
            .await;

        assert_eq!(summary.pairs, 1);
        assert_eq!(
            manager.retrieve("qual o teu nome", 1).await.as_deref(),
            Some("Chamo-me Zenia")
        );
    }

    #[tokio::test]
    async fn missing_file_yields_zero_pairs() {
        let (importer, manager) = importer();
        let summary = importer
            .import(DatasetKind::Squad, "/nonexistent/squad.json")
            .await;
        assert_eq!(
            summary,
            ImportSummary {
                dataset: DatasetKind::Squad,
                pairs: 0
            }
        );
        assert_eq!(manager.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn import_all_follows_source_order() {
        let dir = tempfile::tempdir().unwrap();
        let reddit = dir.path().join("reddit.json");
        std::fs::write(&reddit, r#"{"conversations": [["a", "b", "c"]]}"#).unwrap();

        let (importer, _) = importer();
        let sources = vec![
            DatasetSource {
                kind: DatasetKind::Reddit,
                location: reddit.to_str().unwrap().to_string(),
            },
            DatasetSource {
                kind: DatasetKind::Coqa,
                location: dir.path().join("missing.json").to_str().unwrap().to_string(),
            },
        ];
        let summaries = importer.import_all(&sources).await;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].pairs, 2);
        assert_eq!(summaries[1].pairs, 0);
    }
}
