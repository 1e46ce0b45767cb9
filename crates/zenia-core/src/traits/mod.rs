// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Both adapters extend [`PluginAdapter`] and use `#[async_trait]` so the
//! memory manager can hold them as trait objects.

pub mod adapter;
pub mod embedding;
pub mod storage;

pub use adapter::PluginAdapter;
pub use embedding::EmbeddingAdapter;
pub use storage::StorageAdapter;
