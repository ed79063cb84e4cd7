// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector index trait for nearest-neighbour lookups.

use async_trait::async_trait;

use crate::error::MedibotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::VectorMatch;

/// Read side of a hosted vector database.
#[async_trait]
pub trait VectorIndex: PluginAdapter {
    /// Returns up to `top_k` stored chunks closest to `vector`, best first.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, MedibotError>;
}
