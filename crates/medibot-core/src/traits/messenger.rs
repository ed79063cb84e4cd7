// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messenger trait for chat gateway integrations.

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DeliveryReceipt;

/// Sends plain-text messages to a chat recipient.
///
/// Implementations make exactly one attempt per call. Whether a failure is
/// surfaced to the end user is the caller's decision.
#[async_trait]
pub trait Messenger: PluginAdapter {
    /// Sends `text` to the chat address `recipient`.
    async fn send(&self, recipient: &str, text: &str) -> Result<DeliveryReceipt, DeliveryError>;
}
