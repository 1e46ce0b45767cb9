// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by the storage and embedding adapters.

use async_trait::async_trait;

use crate::error::ZeniaError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and lifecycle common to every adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short backend name, e.g. `sqlite`, `in-memory`, `onnx-embedder`.
    fn name(&self) -> &str;

    /// Which seam this adapter plugs into.
    fn adapter_type(&self) -> AdapterType;

    /// Reports whether the adapter can currently serve requests.
    async fn health_check(&self) -> Result<HealthStatus, ZeniaError>;

    /// Releases held resources. Adapters without any keep the default.
    async fn shutdown(&self) -> Result<(), ZeniaError> {
        Ok(())
    }
}
