// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for memory record backends.

use async_trait::async_trait;

use crate::error::ZeniaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::MemoryRecord;

/// Durable (or degraded in-process) mapping from record id to [`MemoryRecord`].
///
/// Every mutating call is atomic from the caller's point of view: a failed
/// `put` never leaves a partially written record visible to `get_all`.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Prepares the backend. Calling it again after success is a no-op.
    async fn initialize(&self) -> Result<(), ZeniaError>;

    /// Inserts or replaces the record with the same id.
    async fn put(&self, record: &MemoryRecord) -> Result<(), ZeniaError>;

    /// Snapshot of every stored record, in store iteration order.
    async fn get_all(&self) -> Result<Vec<MemoryRecord>, ZeniaError>;

    /// Removes all records.
    async fn clear(&self) -> Result<(), ZeniaError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, ZeniaError>;

    /// Whether records survive a process restart.
    fn is_durable(&self) -> bool;
}
