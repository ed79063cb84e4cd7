// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-scoped domain types shared by the webhook pipeline and adapters.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Messenger,
    Retriever,
    Embedding,
    VectorIndex,
    Completion,
    Storage,
}

/// Canonical form of an inbound chat message, independent of the provider shape.
///
/// Produced once per webhook call by the payload normalizer. Absence of a
/// field is encoded as `None`; normalization never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedMessage {
    /// Chat address of the sender (a JID such as `2348012345678@s.whatsapp.net`).
    pub sender_id: Option<String>,
    /// Provider message identifier, when the payload carries one.
    pub message_id: Option<String>,
    /// The message was sent by the bot's own account.
    pub is_from_self: bool,
    /// The sender address is a multi-party chat.
    pub is_group_chat: bool,
    /// Trimmed message text; never `Some("")`.
    pub text: Option<String>,
    /// Display name the sender set in their profile.
    pub display_name: Option<String>,
}

/// Outcome of the intent classifier for one message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    pub is_greeting: bool,
    pub is_medical: bool,
}

/// Answer produced by a retriever.
///
/// An empty answer is a valid outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerResult {
    pub text: String,
}

impl AnswerResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// An answer with no text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the answer has nothing to send after trimming.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Acknowledgement from the chat gateway for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// HTTP status returned by the gateway (always 2xx).
    pub status: u16,
    /// Gateway message id, if the response body carried one.
    pub message_id: Option<String>,
}

/// One turn handed to a completion model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A request to a completion model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
}

/// A response from a completion model.
///
/// `text` is `None` when the model returned no choices or an empty message.
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    pub text: Option<String>,
}

/// A single nearest-neighbour hit from the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    /// Chunk text stored alongside the vector.
    pub text: Option<String>,
}

/// A contact known to the bot, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub phone: String,
    pub display_name: Option<String>,
    /// RFC 3339 timestamp of the first accepted message.
    pub first_seen: String,
    /// RFC 3339 timestamp of the latest accepted message.
    pub last_seen: String,
    pub message_count: i64,
}
