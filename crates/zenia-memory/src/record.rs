// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of new memory records.

use rand::Rng;
use rand::distributions::Alphanumeric;
use zenia_core::{MemoryRecord, RecordKind};

/// Length of the random part of a record id.
const ID_SUFFIX_LEN: usize = 8;

/// Truncation bounds applied when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    pub max_question_chars: usize,
    pub max_answer_chars: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            max_question_chars: 1000,
            max_answer_chars: 10_000,
        }
    }
}

/// First `max_chars` code points of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Time-based id with a random alphanumeric suffix, e.g. `1767225600000-x8Kp2QaZ`.
pub fn new_record_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{millis}-{suffix}")
}

/// Build a fresh Q/A record with truncated text and the current timestamp.
pub fn new_qa_record(
    question: &str,
    answer: &str,
    embedding: Option<Vec<f32>>,
    limits: TextLimits,
) -> MemoryRecord {
    MemoryRecord {
        id: new_record_id(),
        kind: RecordKind::Qa,
        question: truncate_chars(question, limits.max_question_chars),
        answer: truncate_chars(answer, limits.max_answer_chars),
        embedding,
        created_at: chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn truncate_counts_code_points_not_bytes() {
        assert_eq!(truncate_chars("olá mundo", 3), "olá");
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn new_record_applies_limits() {
        let limits = TextLimits {
            max_question_chars: 4,
            max_answer_chars: 6,
        };
        let rec = new_qa_record("qual o teu nome", "Chamo-me Zenia", None, limits);
        assert_eq!(rec.question, "qual");
        assert_eq!(rec.answer, "Chamo-");
        assert_eq!(rec.kind, RecordKind::Qa);
        assert!(rec.created_at.ends_with('Z'));
    }

    #[test]
    fn default_limits() {
        let limits = TextLimits::default();
        assert_eq!(limits.max_question_chars, 1000);
        assert_eq!(limits.max_answer_chars, 10_000);
    }

    #[test]
    fn ids_are_unique_and_shaped() {
        let ids: HashSet<String> = (0..500).map(|_| new_record_id()).collect();
        assert_eq!(ids.len(), 500);

        let id = new_record_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    proptest! {
        #[test]
        fn truncation_keeps_a_prefix_within_bound(text in "\\PC{0,64}", max in 0usize..80) {
            let out = truncate_chars(&text, max);
            prop_assert!(out.chars().count() <= max);
            prop_assert!(text.starts_with(&out));
            prop_assert_eq!(out.chars().count(), text.chars().count().min(max));
        }
    }
}
