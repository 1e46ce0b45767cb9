// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Zenia integration tests.
//!
//! Provides a deterministic embedder and a harness that assembles a full
//! memory stack on a temporary database, so tests run without model files
//! or network access.
//!
//! # Components
//!
//! - [`MockEmbedder`] - Deterministic embedding adapter with pinned vectors and failures
//! - [`TestHarness`] - Memory stack on a temp SQLite database

pub mod harness;
pub mod mock_embedder;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_embedder::{MOCK_DIM, MockEmbedder};
