// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ONNX sentence-embedding adapter for local CPU inference.
//!
//! Runs a sentence-transformers model exported to ONNX (all-MiniLM-L6-v2 by
//! default). Token vectors are mean-pooled under the attention mask and
//! L2-normalised, so cosine similarity equals the dot product.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use tracing::debug;

use zenia_core::ZeniaError;
use zenia_core::traits::{EmbeddingAdapter, PluginAdapter};
use zenia_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// File name of the ONNX graph inside a model directory.
pub const MODEL_FILE: &str = "model.onnx";
/// File name of the HuggingFace tokenizer inside a model directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Embedding adapter backed by an ONNX Runtime session.
///
/// Inference runs on tokio's blocking pool, so concurrent `embed` calls queue
/// on the session lock without stalling async workers.
pub struct OnnxEmbedder {
    model: Arc<OnnxModel>,
}

struct OnnxModel {
    /// `Session::run` needs `&mut self`.
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
}

impl OnnxEmbedder {
    /// Load `model.onnx` and `tokenizer.json` from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self, ZeniaError> {
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            ZeniaError::ProviderUnavailable(format!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;

        let model_path = model_dir.join(MODEL_FILE);
        let session = Session::builder()
            .map_err(unavailable)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(unavailable)?
            .with_intra_threads(1)
            .map_err(unavailable)?
            .commit_from_file(&model_path)
            .map_err(|e| {
                ZeniaError::ProviderUnavailable(format!(
                    "failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        debug!(model = %model_path.display(), "ONNX embedder loaded");
        Ok(Self {
            model: Arc::new(OnnxModel {
                session: Mutex::new(session),
                tokenizer,
            }),
        })
    }

    /// Embed one text into a unit-length vector on the calling thread.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, ZeniaError> {
        self.model.embed_text(text)
    }
}

impl OnnxModel {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, ZeniaError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ZeniaError::embedding(format!("tokenization failed: {e}")))?;

        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| i64::from(m))
            .collect();
        let seq_len = attention_mask.len();

        let to_array = |values: Vec<i64>| {
            Array2::from_shape_vec((1, seq_len), values)
                .map_err(|e| ZeniaError::embedding(format!("input tensor shape: {e}")))
        };
        let input_ids = to_array(encoding.get_ids().iter().map(|&v| i64::from(v)).collect())?;
        let token_type_ids =
            to_array(encoding.get_type_ids().iter().map(|&v| i64::from(v)).collect())?;
        let mask = to_array(attention_mask.clone())?;

        let input_ids = TensorRef::from_array_view(&input_ids).map_err(tensor_err)?;
        let mask = TensorRef::from_array_view(&mask).map_err(tensor_err)?;
        let token_type_ids = TensorRef::from_array_view(&token_type_ids).map_err(tensor_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ZeniaError::embedding(format!("ONNX session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => mask,
                "token_type_ids" => token_type_ids
            ])
            .map_err(|e| ZeniaError::embedding(format!("ONNX inference failed: {e}")))?;

        // Shape [1, seq_len, hidden].
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ZeniaError::embedding(format!("output tensor: {e}")))?;
        let hidden_size = shape
            .last()
            .and_then(|&d| usize::try_from(d).ok())
            .filter(|&d| d > 0)
            .ok_or_else(|| ZeniaError::embedding("model returned an empty hidden dimension"))?;

        let pooled = mean_pool_with_attention(data, &attention_mask, seq_len, hidden_size);
        Ok(l2_normalize(&pooled))
    }
}

/// Average the token vectors whose attention mask is set.
fn mean_pool_with_attention(
    embeddings: &[f32],
    attention_mask: &[i64],
    seq_len: usize,
    hidden_size: usize,
) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for (token, row) in embeddings.chunks_exact(hidden_size).take(seq_len).enumerate() {
        if attention_mask.get(token).copied().unwrap_or(0) > 0 {
            for (acc, v) in sum.iter_mut().zip(row) {
                *acc += v;
            }
            count += 1.0;
        }
    }

    if count > 0.0 {
        for val in &mut sum {
            *val /= count;
        }
    }
    sum
}

/// Run CPU-bound work on tokio's blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, ZeniaError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ZeniaError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ZeniaError::embedding(format!("inference task failed: {e}")))?
}

fn unavailable(e: impl std::fmt::Display) -> ZeniaError {
    ZeniaError::ProviderUnavailable(format!("onnx session setup: {e}"))
}

fn tensor_err(e: impl std::fmt::Display) -> ZeniaError {
    ZeniaError::embedding(format!("input tensor: {e}"))
}

fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl PluginAdapter for OnnxEmbedder {
    fn name(&self) -> &str {
        "onnx-embedder"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, ZeniaError> {
        match self.model.session.lock() {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("session lock poisoned: {e}"))),
        }
    }
}

#[async_trait]
impl EmbeddingAdapter for OnnxEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, ZeniaError> {
        let model = Arc::clone(&self.model);
        let texts = input.texts;
        let embeddings = run_blocking(move || {
            texts
                .iter()
                .map(|text| model.embed_text(text))
                .collect::<Result<Vec<_>, _>>()
        })
        .await?;
        let dimensions = embeddings.first().map(Vec::len).unwrap_or_default();
        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_normalize_general_vector() {
        let n = l2_normalize(&[3.0, 4.0]);
        assert!((n[0] - 0.6).abs() < 0.001);
        assert!((n[1] - 0.8).abs() < 0.001);
    }

    #[test]
    fn l2_normalize_leaves_zero_vector() {
        assert_eq!(l2_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn mean_pool_skips_padding() {
        let embeddings = vec![
            9.0, 9.0, 9.0, // padding
            1.0, 2.0, 3.0,
        ];
        let result = mean_pool_with_attention(&embeddings, &[0, 1], 2, 3);
        assert_eq!(result, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn mean_pool_averages_real_tokens() {
        let embeddings = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = mean_pool_with_attention(&embeddings, &[1, 1, 1], 3, 2);
        assert!((result[0] - 3.0).abs() < f32::EPSILON);
        assert!((result[1] - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn mean_pool_all_masked_is_zero() {
        let result = mean_pool_with_attention(&[1.0, 1.0], &[0], 1, 2);
        assert_eq!(result, vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn inference_work_leaves_the_async_thread() {
        let caller = std::thread::current().id();
        let worker = run_blocking(|| Ok(std::thread::current().id())).await.unwrap();
        assert_ne!(caller, worker);
    }

    #[tokio::test]
    async fn panicking_inference_becomes_embedding_error() {
        let result: Result<(), ZeniaError> = run_blocking(|| panic!("onnx crashed")).await;
        assert!(matches!(result, Err(ZeniaError::Embedding { .. })));
    }

    #[test]
    fn load_from_empty_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxEmbedder::load(dir.path());
        assert!(matches!(result, Err(ZeniaError::ProviderUnavailable(_))));
    }
}
