// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process retrieval-augmented answer pipeline.
//!
//! 1. Embeds the question
//! 2. Fetches the top-K nearest chunks from the vector index
//! 3. Joins their text, in result order, into a context block
//! 4. Asks the completion model to answer from that context only
//!
//! Any failure in steps 1-3 surfaces as a single [`MedibotError::Retrieval`].

use std::sync::Arc;

use async_trait::async_trait;
use medibot_core::types::{ChatMessage, CompletionRequest};
use medibot_core::{
    AdapterType, AnswerResult, AnswerRetriever, CompletionAdapter, EmbeddingAdapter,
    HealthStatus, MedibotError, PluginAdapter, VectorIndex,
};
use tracing::{debug, info};

/// Default instruction given to the completion model.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a careful medical information assistant. \
Answer the user's question using only the information in the provided context. \
If the context does not contain enough information to answer, say politely that you \
do not have enough information and suggest consulting a qualified health worker. \
Never invent facts, dosages, or statistics. Keep a calm, professional tone, and make \
clear that your answer is general information, not a diagnosis.";

/// Returned when the model produced no completion at all.
pub const FALLBACK_ANSWER: &str = "I'm sorry, I couldn't find an answer to that question \
right now. Please consult a health worker.";

/// Separator between retrieved chunks in the context block.
const CHUNK_SEPARATOR: &str = "\n\n";

pub struct PipelineRetriever {
    embedder: Arc<dyn EmbeddingAdapter>,
    index: Arc<dyn VectorIndex>,
    completion: Arc<dyn CompletionAdapter>,
    top_k: usize,
    system_prompt: String,
}

impl PipelineRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingAdapter>,
        index: Arc<dyn VectorIndex>,
        completion: Arc<dyn CompletionAdapter>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            completion,
            top_k: top_k.max(1),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replaces the default system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    fn messages(&self, context: &str, question: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(format!("Context:\n{context}\n\nQuestion: {question}")),
        ]
    }
}

fn retrieval_failed(step: &str, err: MedibotError) -> MedibotError {
    MedibotError::Retrieval {
        message: format!("{step} failed: {err}"),
        source: Some(Box::new(err)),
    }
}

/// Joins chunk texts in order, skipping matches that carry none.
pub fn build_context<'a>(texts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    texts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

#[async_trait]
impl PluginAdapter for PipelineRetriever {
    fn name(&self) -> &str {
        "rag-pipeline"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retriever
    }

    /// Worst status across the three collaborators.
    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        let statuses = [
            (self.embedder.name().to_string(), self.embedder.health_check().await?),
            (self.index.name().to_string(), self.index.health_check().await?),
            (self.completion.name().to_string(), self.completion.health_check().await?),
        ];
        let mut worst = HealthStatus::Healthy;
        for (name, status) in statuses {
            match status {
                HealthStatus::Unhealthy(msg) => {
                    return Ok(HealthStatus::Unhealthy(format!("{name}: {msg}")));
                }
                HealthStatus::Degraded(msg) if worst == HealthStatus::Healthy => {
                    worst = HealthStatus::Degraded(format!("{name}: {msg}"));
                }
                _ => {}
            }
        }
        Ok(worst)
    }
}

#[async_trait]
impl AnswerRetriever for PipelineRetriever {
    async fn retrieve(&self, question: &str) -> Result<AnswerResult, MedibotError> {
        let vector = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| retrieval_failed("embedding", e))?;

        let matches = self
            .index
            .query(&vector, self.top_k)
            .await
            .map_err(|e| retrieval_failed("vector search", e))?;
        let context = build_context(matches.iter().map(|m| m.text.as_deref()));
        debug!(matches = matches.len(), context_chars = context.len(), "context assembled");

        let response = self
            .completion
            .complete(CompletionRequest {
                messages: self.messages(&context, question),
                temperature: None,
            })
            .await
            .map_err(|e| retrieval_failed("completion", e))?;

        match response.text {
            Some(text) => Ok(AnswerResult::new(text.trim())),
            None => {
                info!("completion returned no choice, using fallback answer");
                Ok(AnswerResult::new(FALLBACK_ANSWER))
            }
        }
    }
}
