// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Medibot.
//!
//! Holds the user directory: one record per phone number that has written to
//! the bot, with first/last seen timestamps and a message counter. Schema
//! migrations are embedded with refinery and applied on open.

pub mod database;
pub mod directory;
pub mod migrations;

pub use database::{Database, DatabaseLocation};
pub use directory::SqliteUserDirectory;
