// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound messenger.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use medibot_core::{
    AdapterType, DeliveryError, DeliveryReceipt, HealthStatus, MedibotError, Messenger,
    PluginAdapter,
};

/// A message passed to [`Messenger::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub text: String,
}

/// Records every send attempt. Failures are queued with [`fail_next`] or
/// made permanent with [`failing`].
///
/// [`fail_next`]: MockMessenger::fail_next
/// [`failing`]: MockMessenger::failing
pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failures: Arc<Mutex<VecDeque<DeliveryError>>>,
    always_fail: Option<DeliveryError>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            always_fail: None,
        }
    }

    /// A messenger whose every send fails with `error`.
    pub fn failing(error: DeliveryError) -> Self {
        Self {
            always_fail: Some(error),
            ..Self::new()
        }
    }

    /// Makes the next send fail with `error`; later sends succeed again.
    pub async fn fail_next(&self, error: DeliveryError) {
        self.failures.lock().await.push_back(error);
    }

    /// Every attempted send, including failed ones, in order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockMessenger {
    fn name(&self) -> &str {
        "mock-messenger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Messenger
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(&self, recipient: &str, text: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let mut sent = self.sent.lock().await;
        sent.push(SentMessage {
            to: recipient.to_string(),
            text: text.to_string(),
        });
        let n = sent.len();
        drop(sent);

        if let Some(err) = &self.always_fail {
            return Err(err.clone());
        }
        if let Some(err) = self.failures.lock().await.pop_front() {
            return Err(err);
        }
        Ok(DeliveryReceipt {
            status: 200,
            message_id: Some(format!("mock-{n}")),
        })
    }
}
