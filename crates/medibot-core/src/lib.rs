// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Medibot.
//!
//! Holds the error type, the request-scoped domain types, and the adapter
//! traits every collaborator (gateway messenger, retrievers, embedding,
//! vector index, completion model, user directory) implements. The webhook
//! handler only ever talks to these traits, so every collaborator can be
//! swapped for a test double.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DeliveryError, MedibotError};
pub use types::{
    AdapterType, AnswerResult, ClassificationResult, DeliveryReceipt, HealthStatus,
    NormalizedMessage,
};

pub use traits::{
    AnswerRetriever, CompletionAdapter, EmbeddingAdapter, Messenger, PluginAdapter,
    UserDirectory, VectorIndex,
};
