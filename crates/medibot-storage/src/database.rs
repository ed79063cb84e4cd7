// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection handling for the SQLite database.

use std::fmt::Display;
use std::path::PathBuf;

use medibot_core::MedibotError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Handle to the single background SQLite connection.
///
/// All statements run on `tokio-rusqlite`'s dedicated thread, so writes are
/// serialized without extra locking.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

/// Where a `database_url` points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Accepts `sqlite://path`, `sqlite:path`, a bare path, or `:memory:`.
    pub fn parse(url: &str) -> Result<Self, MedibotError> {
        let raw = url.trim();
        let path = raw
            .strip_prefix("sqlite://")
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);
        let path = path.split('?').next().unwrap_or(path);
        match path {
            "" => Err(MedibotError::Config("storage.database_url is empty".into())),
            ":memory:" => Ok(Self::Memory),
            p => Ok(Self::File(PathBuf::from(p))),
        }
    }
}

impl Database {
    /// Opens (creating if needed) the database and applies migrations.
    pub async fn open(url: &str) -> Result<Self, MedibotError> {
        let location = DatabaseLocation::parse(url)?;
        let conn = match &location {
            DatabaseLocation::Memory => tokio_rusqlite::Connection::open_in_memory().await,
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| MedibotError::Storage {
                        source: Box::new(e),
                    })?;
                }
                tokio_rusqlite::Connection::open(path).await
            }
        }
        .map_err(map_tr_err)?;

        let migrated = conn
            .call(|conn| -> Result<Result<(), String>, rusqlite::Error> {
                conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
                Ok(run_migrations(conn).map_err(|e| e.to_string()))
            })
            .await
            .map_err(map_tr_err)?;
        migrated.map_err(|e| storage_error(format!("migration failed: {e}")))?;

        debug!(?location, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

pub(crate) fn storage_error(message: String) -> MedibotError {
    MedibotError::Storage {
        source: message.into(),
    }
}

/// Maps a `tokio-rusqlite` failure into [`MedibotError::Storage`].
pub(crate) fn map_tr_err<E: Display>(err: E) -> MedibotError {
    storage_error(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_forms() {
        assert_eq!(
            DatabaseLocation::parse("sqlite://data/medibot.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("data/medibot.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:medibot.db?mode=rwc").unwrap(),
            DatabaseLocation::File(PathBuf::from("medibot.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("/var/lib/medibot.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("/var/lib/medibot.db"))
        );
        assert_eq!(DatabaseLocation::parse("sqlite::memory:").unwrap(), DatabaseLocation::Memory);
        assert!(DatabaseLocation::parse("sqlite://").is_err());
    }

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/medibot.db");
        let db = Database::open(&format!("sqlite://{}", path.display())).await.unwrap();
        assert!(path.exists());

        let tables: i64 = db
            .connection()
            .call(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("medibot.db").display().to_string();
        Database::open(&url).await.unwrap();
        Database::open(&url).await.unwrap();
    }
}
