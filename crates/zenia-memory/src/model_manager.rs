// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-run download of the ONNX embedding model.
//!
//! Model and tokenizer are fetched from HuggingFace into
//! `<data dir>/zenia/models/<model_name>/` unless `memory.model_dir` points
//! somewhere else.

use std::path::{Path, PathBuf};

use tracing::info;
use zenia_config::model::MemoryConfig;
use zenia_core::ZeniaError;

use crate::embedder::{MODEL_FILE, TOKENIZER_FILE};

/// HuggingFace host that serves sentence-transformers checkpoints.
const DEFAULT_HUB_URL: &str = "https://huggingface.co/sentence-transformers";

/// Resolves model paths and downloads missing files.
pub struct ModelManager {
    model_name: String,
    model_dir: PathBuf,
    hub_url: String,
}

impl ModelManager {
    /// Manager storing `model_name` in `model_dir`.
    pub fn new(model_name: impl Into<String>, model_dir: PathBuf) -> Self {
        Self {
            model_name: model_name.into(),
            model_dir,
            hub_url: DEFAULT_HUB_URL.to_string(),
        }
    }

    /// Manager for the model named in `[memory]`.
    pub fn from_config(config: &MemoryConfig) -> Self {
        let model_dir = match &config.model_dir {
            Some(dir) => PathBuf::from(dir),
            None => default_models_root().join(&config.model_name),
        };
        Self::new(config.model_name.clone(), model_dir)
    }

    /// Download from another hub (mirror, or a mock server in tests).
    pub fn with_hub_url(mut self, hub_url: impl Into<String>) -> Self {
        self.hub_url = hub_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join(TOKENIZER_FILE)
    }

    /// True when both model and tokenizer are on disk.
    pub fn is_model_available(&self) -> bool {
        self.model_path().exists() && self.tokenizer_path().exists()
    }

    /// Make sure the model files exist locally, downloading what is missing.
    ///
    /// Returns the model directory.
    pub async fn ensure_model(&self) -> Result<PathBuf, ZeniaError> {
        if self.is_model_available() {
            return Ok(self.model_dir.clone());
        }

        info!(model = %self.model_name, "embedding model not found, downloading");
        tokio::fs::create_dir_all(&self.model_dir)
            .await
            .map_err(|e| {
                ZeniaError::ProviderUnavailable(format!(
                    "cannot create model directory {}: {e}",
                    self.model_dir.display()
                ))
            })?;

        let base = format!("{}/{}/resolve/main", self.hub_url, self.model_name);
        let files = [
            (MODEL_FILE, format!("{base}/onnx/model.onnx")),
            (TOKENIZER_FILE, format!("{base}/tokenizer.json")),
        ];

        for (filename, url) in &files {
            let dest = self.model_dir.join(filename);
            if dest.exists() {
                continue;
            }
            let size = download_file(url, &dest).await?;
            info!(file = *filename, size, "downloaded");
        }

        info!(dir = %self.model_dir.display(), "embedding model ready");
        Ok(self.model_dir.clone())
    }
}

fn default_models_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zenia")
        .join("models")
}

/// Fetch `url` into `dest`. The file only appears under its final name once complete.
async fn download_file(url: &str, dest: &Path) -> Result<usize, ZeniaError> {
    let unavailable = ZeniaError::ProviderUnavailable;

    let response = reqwest::get(url)
        .await
        .map_err(|e| unavailable(format!("failed to download {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(unavailable(format!(
            "download failed with status {}: {url}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| unavailable(format!("failed to read body from {url}: {e}")))?;

    let partial = dest.with_extension("part");
    if let Err(e) = tokio::fs::write(&partial, &bytes).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(unavailable(format!("failed to write {}: {e}", partial.display())));
    }
    tokio::fs::rename(&partial, dest)
        .await
        .map_err(|e| unavailable(format!("failed to move {}: {e}", dest.display())))?;

    Ok(bytes.len())
}
