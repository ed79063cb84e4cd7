// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory user directory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use medibot_core::types::UserRecord;
use medibot_core::{AdapterType, HealthStatus, MedibotError, PluginAdapter, UserDirectory};

/// Same upsert semantics as the SQLite directory, kept in a `HashMap`.
/// [`failing`](MockUserDirectory::failing) makes every write return a storage error.
pub struct MockUserDirectory {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
    fail_writes: bool,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            fail_writes: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

impl Default for MockUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockUserDirectory {
    fn name(&self) -> &str {
        "mock-users"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn record_contact(
        &self,
        phone: &str,
        display_name: Option<&str>,
    ) -> Result<(), MedibotError> {
        if self.fail_writes {
            return Err(MedibotError::Storage {
                source: "mock directory write failure".into(),
            });
        }
        let now = Utc::now().to_rfc3339();
        let mut users = self.users.lock().await;
        let record = users.entry(phone.to_string()).or_insert_with(|| UserRecord {
            phone: phone.to_string(),
            display_name: None,
            first_seen: now.clone(),
            last_seen: now.clone(),
            message_count: 0,
        });
        if let Some(name) = display_name {
            record.display_name = Some(name.to_string());
        }
        record.last_seen = now;
        record.message_count += 1;
        Ok(())
    }

    async fn get_user(&self, phone: &str) -> Result<Option<UserRecord>, MedibotError> {
        Ok(self.users.lock().await.get(phone).cloned())
    }
}
