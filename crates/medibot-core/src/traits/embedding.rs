// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::MedibotError;
use crate::traits::adapter::PluginAdapter;

/// Converts text into a fixed-length vector for similarity search.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MedibotError>;
}
