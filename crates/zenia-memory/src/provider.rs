// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding provider with a one-shot initialization state.
//!
//! The model is loaded at most once per process. A failed load leaves the
//! provider `Unavailable` until the process exits, and every caller then
//! takes its lexical fallback path.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use zenia_config::model::MemoryConfig;
use zenia_core::types::EmbeddingInput;
use zenia_core::{EmbeddingAdapter, ZeniaError};

use crate::embedder::OnnxEmbedder;
use crate::model_manager::ModelManager;

/// Produces the embedding adapter on first initialization.
#[async_trait]
pub trait EmbeddingLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn EmbeddingAdapter>, ZeniaError>;
}

/// Loads the ONNX model, downloading it first if needed.
pub struct OnnxLoader {
    models: ModelManager,
}

impl OnnxLoader {
    pub fn new(models: ModelManager) -> Self {
        Self { models }
    }
}

#[async_trait]
impl EmbeddingLoader for OnnxLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingAdapter>, ZeniaError> {
        let model_dir = self.models.ensure_model().await?;
        // Session construction parses the whole graph.
        let embedder = tokio::task::spawn_blocking(move || OnnxEmbedder::load(&model_dir))
            .await
            .map_err(|e| ZeniaError::Internal(format!("model load task failed: {e}")))??;
        Ok(Arc::new(embedder))
    }
}

/// Outcome of [`EmbeddingProvider::initialize`].
#[derive(Clone)]
pub enum ProviderState {
    Ready(Arc<dyn EmbeddingAdapter>),
    Unavailable(String),
}

impl std::fmt::Debug for ProviderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderState::Ready(adapter) => f.debug_tuple("Ready").field(&adapter.name()).finish(),
            ProviderState::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Text-to-vector capability used by the memory manager.
pub struct EmbeddingProvider {
    loader: Option<Box<dyn EmbeddingLoader>>,
    state: OnceCell<ProviderState>,
}

impl EmbeddingProvider {
    /// Provider that will load through `loader` on [`initialize`](Self::initialize).
    pub fn new(loader: impl EmbeddingLoader + 'static) -> Self {
        Self {
            loader: Some(Box::new(loader)),
            state: OnceCell::new(),
        }
    }

    /// Provider that is permanently unavailable.
    pub fn disabled() -> Self {
        Self {
            loader: None,
            state: OnceCell::new(),
        }
    }

    /// Provider that is already ready with `adapter`.
    pub fn ready(adapter: Arc<dyn EmbeddingAdapter>) -> Self {
        Self {
            loader: None,
            state: OnceCell::new_with(Some(ProviderState::Ready(adapter))),
        }
    }

    /// ONNX provider for `[memory]`, or a disabled one when embeddings are off.
    pub fn from_config(config: &MemoryConfig) -> Self {
        if config.embeddings_enabled {
            Self::new(OnnxLoader::new(ModelManager::from_config(config)))
        } else {
            Self::disabled()
        }
    }

    /// Load the model once. Later calls return the cached state.
    pub async fn initialize(&self) -> &ProviderState {
        self.state
            .get_or_init(|| async {
                let Some(loader) = &self.loader else {
                    info!("embeddings disabled, retrieval is lexical only");
                    return ProviderState::Unavailable("embeddings disabled".to_string());
                };
                match loader.load().await {
                    Ok(adapter) => {
                        info!(adapter = adapter.name(), "embedding provider ready");
                        ProviderState::Ready(adapter)
                    }
                    Err(e) => {
                        warn!(error = %e, "embedding provider unavailable, retrieval is lexical only");
                        ProviderState::Unavailable(e.to_string())
                    }
                }
            })
            .await
    }

    /// Current state, `None` before [`initialize`](Self::initialize) ran.
    pub fn state(&self) -> Option<&ProviderState> {
        self.state.get()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state.get(), Some(ProviderState::Ready(_)))
    }

    /// Embed `text`, failing with [`ZeniaError::ProviderUnavailable`] when not ready.
    pub async fn try_embed(&self, text: &str) -> Result<Vec<f32>, ZeniaError> {
        let Some(ProviderState::Ready(adapter)) = self.state.get() else {
            return Err(ZeniaError::ProviderUnavailable(
                "provider is not ready".to_string(),
            ));
        };
        let output = adapter.embed(EmbeddingInput::single(text)).await?;
        output
            .embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ZeniaError::embedding("adapter returned no vector"))
    }

    /// Embed `text`, or `None` when unavailable or the computation fails.
    pub async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        if !self.is_ready() {
            return None;
        }
        match self.try_embed(text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(error = %e, "embedding failed");
                None
            }
        }
    }
}
