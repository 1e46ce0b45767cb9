// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local semantic memory for Zenia.
//!
//! Question/answer pairs are stored with an optional sentence embedding and
//! retrieved by cosine similarity, with lexical overlap as the fallback when
//! embeddings are unavailable or inconclusive.
//!
//! ## Architecture
//!
//! - **OnnxEmbedder**: local ONNX model for sentence embeddings
//! - **ModelManager**: first-run model download from HuggingFace
//! - **EmbeddingProvider**: one-shot initialization, `Ready` or `Unavailable`
//! - **similarity**: cosine and lexical overlap scoring
//! - **MemoryManager**: record, retrieve, startup embedding repair
//! - **DatasetImporter**: seeding from SQuAD, CoQA, QuAC, Persona-Chat, Reddit
//! - **MemoryContext**: the application root tying it all together

pub mod context;
pub mod embedder;
pub mod importer;
pub mod manager;
pub mod model_manager;
pub mod provider;
pub mod record;
pub mod similarity;

pub use context::MemoryContext;
pub use embedder::OnnxEmbedder;
pub use importer::{DatasetImporter, ImportSummary};
pub use manager::{MemoryEvent, MemoryManager, RepairSummary};
pub use model_manager::ModelManager;
pub use provider::{EmbeddingLoader, EmbeddingProvider, OnnxLoader, ProviderState};
pub use record::TextLimits;
