// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User directory trait: the one record the bot keeps per contact.

use async_trait::async_trait;

use crate::error::MedibotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserRecord;

/// Contact registry keyed by phone number.
#[async_trait]
pub trait UserDirectory: PluginAdapter {
    /// Creates the record on first contact, otherwise bumps `last_seen` and
    /// `message_count` and refreshes the display name when one is given.
    async fn record_contact(
        &self,
        phone: &str,
        display_name: Option<&str>,
    ) -> Result<(), MedibotError>;

    /// Looks up a contact by phone number.
    async fn get_user(&self, phone: &str) -> Result<Option<UserRecord>, MedibotError>;
}
