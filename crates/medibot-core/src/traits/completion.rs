// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter trait for hosted chat models.

use async_trait::async_trait;

use crate::error::MedibotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Single-shot chat completion.
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, MedibotError>;
}
