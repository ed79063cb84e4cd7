// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`UserDirectory`].

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use medibot_core::types::UserRecord;
use medibot_core::{AdapterType, HealthStatus, MedibotError, PluginAdapter, UserDirectory};

use crate::database::{Database, map_tr_err};

/// One row per phone number; every accepted message bumps `last_seen` and
/// `message_count`.
pub struct SqliteUserDirectory {
    db: Database,
}

impl SqliteUserDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens the database at `url` and wraps it.
    pub async fn open(url: &str) -> Result<Self, MedibotError> {
        Ok(Self::new(Database::open(url).await?))
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl PluginAdapter for SqliteUserDirectory {
    fn name(&self) -> &str {
        "sqlite-users"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn record_contact(
        &self,
        phone: &str,
        display_name: Option<&str>,
    ) -> Result<(), MedibotError> {
        let phone = phone.to_string();
        let display_name = display_name.map(str::to_string);
        let seen = now();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO users (phone, display_name, first_seen, last_seen, message_count)
                     VALUES (?1, ?2, ?3, ?3, 1)
                     ON CONFLICT(phone) DO UPDATE SET
                         display_name = COALESCE(excluded.display_name, users.display_name),
                         last_seen = excluded.last_seen,
                         message_count = users.message_count + 1",
                    params![phone, display_name, seen],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("contact recorded");
        Ok(())
    }

    async fn get_user(&self, phone: &str) -> Result<Option<UserRecord>, MedibotError> {
        let phone = phone.to_string();
        self.db
            .connection()
            .call(move |conn| {
                conn.query_row(
                    "SELECT phone, display_name, first_seen, last_seen, message_count
                     FROM users WHERE phone = ?1",
                    params![phone],
                    |row| {
                        Ok(UserRecord {
                            phone: row.get(0)?,
                            display_name: row.get(1)?,
                            first_seen: row.get(2)?,
                            last_seen: row.get(3)?,
                            message_count: row.get(4)?,
                        })
                    },
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }
}
