//! SQLite-backed calendar store and shared column codecs.
//!
//! # Responsibility
//! - Own the migrated connection used by every repository implementation.
//! - Convert between domain values and their SQLite column encoding.
//!
//! # Invariants
//! - Date-times are stored as `YYYY-MM-DD HH:MM` text, so lexical order
//!   equals chronological order.
//! - Notification offsets are stored as `HH:MM` text.

use super::{RepoError, RepoResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::event::NotifyOffset;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;

const DATE_TIME_COLUMN_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Calendar store over one migrated SQLite connection.
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a fresh migrated in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrows the underlying connection for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

pub(crate) fn date_time_to_db(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_COLUMN_FORMAT).to_string()
}

pub(crate) fn parse_date_time_column(value: &str, column: &str) -> RepoResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_COLUMN_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date-time `{value}` in {column}"))
    })
}

pub(crate) fn parse_offset_column(value: &str, column: &str) -> RepoResult<NotifyOffset> {
    NotifyOffset::parse(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid offset `{value}` in {column}")))
}

pub(crate) fn parse_active_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid is_active value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
