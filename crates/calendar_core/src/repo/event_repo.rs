//! Event repository contract and SQLite implementation.
//!
//! # Invariants
//! - `purge_events_before` deletes link rows and event rows in one
//!   transaction; either both succeed or neither does.

use super::sqlite_store::{
    bool_to_int, date_time_to_db, parse_active_flag, parse_date_time_column,
    parse_offset_column, SqliteStore,
};
use super::{RepoError, RepoResult};
use crate::model::event::NotifyOffset;
use crate::model::StoreId;
use chrono::NaiveDateTime;
use rusqlite::{params, Row, TransactionBehavior};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    event_name,
    event_date,
    notification_offset,
    event_location,
    event_description,
    category_id,
    is_active
FROM events";

/// Stored shape of one event row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: StoreId,
    pub name: String,
    pub date_time: NaiveDateTime,
    pub notify_offset: NotifyOffset,
    pub location: String,
    pub description: String,
    pub category_id: Option<StoreId>,
    pub is_active: bool,
}

/// Repository interface for event persistence.
pub trait EventRepository {
    /// Inserts an active row and returns the generated id. `row.id` is ignored.
    fn create_event(&self, row: &EventRow) -> RepoResult<StoreId>;
    /// Gets one row by id, active or not.
    fn get_event(&self, id: StoreId) -> RepoResult<Option<EventRow>>;
    /// Overwrites all scalar columns. Does not change `is_active`.
    fn update_event(&self, row: &EventRow) -> RepoResult<()>;
    /// Lists active rows ordered by date, then id.
    fn list_active_events(&self) -> RepoResult<Vec<EventRow>>;
    /// Marks a row inactive.
    fn soft_delete_event(&self, id: StoreId) -> RepoResult<()>;
    /// Physically deletes every event dated strictly before `cutoff`, with
    /// its link rows, atomically. Returns the number of deleted events.
    fn purge_events_before(&mut self, cutoff: NaiveDateTime) -> RepoResult<usize>;
}

impl EventRepository for SqliteStore {
    fn create_event(&self, row: &EventRow) -> RepoResult<StoreId> {
        self.conn.execute(
            "INSERT INTO events (
                event_name,
                event_date,
                notification_offset,
                event_location,
                event_description,
                category_id,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1);",
            params![
                row.name.as_str(),
                date_time_to_db(row.date_time),
                row.notify_offset.to_string(),
                row.location.as_str(),
                row.description.as_str(),
                row.category_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_event(&self, id: StoreId) -> RepoResult<Option<EventRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn update_event(&self, row: &EventRow) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE events
             SET
                event_name = ?1,
                event_date = ?2,
                notification_offset = ?3,
                event_location = ?4,
                event_description = ?5,
                category_id = ?6
             WHERE id = ?7;",
            params![
                row.name.as_str(),
                date_time_to_db(row.date_time),
                row.notify_offset.to_string(),
                row.location.as_str(),
                row.description.as_str(),
                row.category_id,
                row.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "event",
                id: row.id,
            });
        }
        Ok(())
    }

    fn list_active_events(&self) -> RepoResult<Vec<EventRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL} WHERE is_active = ?1 ORDER BY event_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(true)])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn soft_delete_event(&self, id: StoreId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE events SET is_active = 0 WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "event", id });
        }
        Ok(())
    }

    fn purge_events_before(&mut self, cutoff: NaiveDateTime) -> RepoResult<usize> {
        let cutoff_text = date_time_to_db(cutoff);
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM events_contacts
             WHERE event_id IN (SELECT id FROM events WHERE event_date < ?1);",
            [cutoff_text.as_str()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM events WHERE event_date < ?1;",
            [cutoff_text.as_str()],
        )?;
        tx.commit()?;
        Ok(deleted)
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<EventRow> {
    let date_text: String = row.get("event_date")?;
    let offset_text: String = row.get("notification_offset")?;
    Ok(EventRow {
        id: row.get("id")?,
        name: row.get("event_name")?,
        date_time: parse_date_time_column(&date_text, "events.event_date")?,
        notify_offset: parse_offset_column(&offset_text, "events.notification_offset")?,
        location: row.get("event_location")?,
        description: row.get("event_description")?,
        category_id: row.get("category_id")?,
        is_active: parse_active_flag(row.get("is_active")?, "events.is_active")?,
    })
}
