// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answer retriever trait for question answering backends.

use async_trait::async_trait;

use crate::error::MedibotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::AnswerResult;

/// Produces an answer for a health question.
///
/// Any collaborator failure is reported as [`MedibotError::Retrieval`]. An
/// answer with no text is returned as `Ok` with an empty [`AnswerResult`].
#[async_trait]
pub trait AnswerRetriever: PluginAdapter {
    async fn retrieve(&self, question: &str) -> Result<AnswerResult, MedibotError>;
}
