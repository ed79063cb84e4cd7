// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answer retrieval for Medibot.
//!
//! Two [`AnswerRetriever`] implementations are provided:
//!
//! - [`PipelineRetriever`]: embeds the question, searches a vector index and
//!   asks a completion model, all in-process
//! - [`RemoteRetriever`]: forwards the question to an external RAG service
//!
//! [`build_retriever`] picks one according to `rag.mode`.

mod http;

pub mod completion;
pub mod embedding;
pub mod pipeline;
pub mod remote;
pub mod vector;

use std::sync::Arc;

use medibot_config::model::{MedibotConfig, RagMode};
use medibot_core::{AnswerRetriever, MedibotError};
use tracing::info;

pub use completion::OpenAiCompletion;
pub use embedding::OpenAiEmbedder;
pub use pipeline::{PipelineRetriever, DEFAULT_SYSTEM_PROMPT, FALLBACK_ANSWER};
pub use remote::RemoteRetriever;
pub use vector::PineconeIndex;

/// Builds the retriever selected by `config.rag.mode`.
pub fn build_retriever(config: &MedibotConfig) -> Result<Arc<dyn AnswerRetriever>, MedibotError> {
    match config.rag.mode {
        RagMode::Pipeline => {
            let mut retriever = PipelineRetriever::new(
                Arc::new(OpenAiEmbedder::from_config(&config.embedding)?),
                Arc::new(PineconeIndex::from_config(&config.vector)?),
                Arc::new(OpenAiCompletion::from_config(&config.completion)?),
                config.rag.top_k,
            );
            let custom_prompt = config
                .rag
                .system_prompt
                .as_deref()
                .filter(|p| !p.trim().is_empty());
            if let Some(prompt) = custom_prompt {
                retriever = retriever.with_system_prompt(prompt);
            }
            info!(
                embedding_model = %config.embedding.model,
                completion_model = %config.completion.model,
                top_k = config.rag.top_k,
                "RAG pipeline initialized"
            );
            Ok(Arc::new(retriever))
        }
        RagMode::Remote => {
            let endpoint = config
                .rag
                .endpoint
                .clone()
                .ok_or_else(|| MedibotError::Config("rag.endpoint is not set".into()))?;
            info!(endpoint = %endpoint, "remote RAG retriever initialized");
            Ok(Arc::new(RemoteRetriever::new(endpoint)?))
        }
    }
}
