// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure scoring functions used by retrieval.

/// Cosine similarity between two vectors, clamped to `[-1, 1]`.
///
/// Returns exactly `-1.0` when either vector is empty, has zero magnitude,
/// or the lengths differ. Degenerate input means "no similarity", never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return -1.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return -1.0;
    }

    let sim = dot / denom;
    if sim.is_nan() {
        return -1.0;
    }
    sim.clamp(-1.0, 1.0)
}

/// Lowercase word tokens of `text`. Separators are any non-alphanumeric char.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of query tokens that occur as substrings of `candidate`, case-insensitive.
///
/// Repeated query tokens are counted once per occurrence in the query.
pub fn lexical_overlap_score(query: &str, candidate: &str) -> usize {
    let candidate = candidate.to_lowercase();
    tokenize(query)
        .iter()
        .filter(|token| candidate.contains(token.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.3, -0.2, 0.9];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < f32::EPSILON);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn magnitude_does_not_matter() {
        let sim = cosine_similarity(&[3.0, 4.0], &[30.0, 40.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_exactly_minus_one() {
        assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), -1.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]), -1.0);
    }

    #[test]
    fn empty_or_mismatched_scores_minus_one() {
        assert_eq!(cosine_similarity(&[], &[1.0]), -1.0);
        assert_eq!(cosine_similarity(&[1.0], &[]), -1.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), -1.0);
    }

    #[test]
    fn tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(
            tokenize("Qual é o CLIMA, hoje?!"),
            vec!["qual", "é", "o", "clima", "hoje"]
        );
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn overlap_counts_substring_matches() {
        assert_eq!(lexical_overlap_score("pesquisar clima", "qual é o clima"), 1);
        assert_eq!(lexical_overlap_score("qual o teu nome", "qual o teu nome"), 4);
        assert_eq!(lexical_overlap_score("TEU", "qual o teu nome"), 1);
        assert_eq!(lexical_overlap_score("xyz", "qual o teu nome"), 0);
        assert_eq!(lexical_overlap_score("", "qual o teu nome"), 0);
    }

    #[test]
    fn overlap_matches_inside_words() {
        // "nom" is a substring of "nome"
        assert_eq!(lexical_overlap_score("nom", "qual o teu nome"), 1);
    }

    proptest! {
        #[test]
        fn cosine_is_bounded(
            a in proptest::collection::vec(-1000.0f32..1000.0, 1..32),
            b in proptest::collection::vec(-1000.0f32..1000.0, 1..32),
        ) {
            let sim = cosine_similarity(&a, &b);
            prop_assert!((-1.0..=1.0).contains(&sim));
        }

        #[test]
        fn cosine_is_symmetric(
            pair in (1usize..32).prop_flat_map(|n| (
                proptest::collection::vec(-10.0f32..10.0, n),
                proptest::collection::vec(-10.0f32..10.0, n),
            ))
        ) {
            let (a, b) = pair;
            prop_assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-6);
        }

        #[test]
        fn overlap_never_exceeds_token_count(query in "\\PC{0,40}", candidate in "\\PC{0,40}") {
            prop_assert!(lexical_overlap_score(&query, &candidate) <= tokenize(&query).len());
        }

        #[test]
        fn text_overlaps_fully_with_itself(text in "[a-zA-Z ]{0,40}") {
            prop_assert_eq!(lexical_overlap_score(&text, &text), tokenize(&text).len());
        }
    }
}
