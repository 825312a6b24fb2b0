//! Event/Contact link-row repository.
//!
//! # Responsibility
//! - Read and write `events_contacts` rows keyed by store ids.
//! - Own the full-replace strategy for one entity's link set.
//!
//! # Invariants
//! - One row per `(event_id, contact_id)` pair; inserts are idempotent.
//! - Replace operations delete and reinsert inside one transaction.

use super::sqlite_store::SqliteStore;
use super::RepoResult;
use crate::model::StoreId;
use rusqlite::{params, Connection, TransactionBehavior};
use std::collections::BTreeSet;

/// Repository interface for event/contact link rows.
pub trait LinkRepository {
    /// Contact ids linked to `event_id`.
    fn event_contact_ids(&self, event_id: StoreId) -> RepoResult<BTreeSet<StoreId>>;
    /// Event ids linked to `contact_id`.
    fn contact_event_ids(&self, contact_id: StoreId) -> RepoResult<BTreeSet<StoreId>>;
    /// Inserts one link row unless it already exists.
    fn insert_link(&self, event_id: StoreId, contact_id: StoreId) -> RepoResult<()>;
    /// Replaces all link rows of `event_id` with `contact_ids`.
    fn replace_event_links(
        &mut self,
        event_id: StoreId,
        contact_ids: &BTreeSet<StoreId>,
    ) -> RepoResult<()>;
    /// Replaces all link rows of `contact_id` with `event_ids`.
    fn replace_contact_links(
        &mut self,
        contact_id: StoreId,
        event_ids: &BTreeSet<StoreId>,
    ) -> RepoResult<()>;
    /// Lists every link row as `(event_id, contact_id)`.
    fn list_links(&self) -> RepoResult<Vec<(StoreId, StoreId)>>;
}

impl LinkRepository for SqliteStore {
    fn event_contact_ids(&self, event_id: StoreId) -> RepoResult<BTreeSet<StoreId>> {
        query_id_set(
            &self.conn,
            "SELECT contact_id FROM events_contacts WHERE event_id = ?1;",
            event_id,
        )
    }

    fn contact_event_ids(&self, contact_id: StoreId) -> RepoResult<BTreeSet<StoreId>> {
        query_id_set(
            &self.conn,
            "SELECT event_id FROM events_contacts WHERE contact_id = ?1;",
            contact_id,
        )
    }

    fn insert_link(&self, event_id: StoreId, contact_id: StoreId) -> RepoResult<()> {
        insert_link_row(&self.conn, event_id, contact_id)
    }

    fn replace_event_links(
        &mut self,
        event_id: StoreId,
        contact_ids: &BTreeSet<StoreId>,
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM events_contacts WHERE event_id = ?1;",
            [event_id],
        )?;
        for contact_id in contact_ids {
            insert_link_row(&tx, event_id, *contact_id)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn replace_contact_links(
        &mut self,
        contact_id: StoreId,
        event_ids: &BTreeSet<StoreId>,
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM events_contacts WHERE contact_id = ?1;",
            [contact_id],
        )?;
        for event_id in event_ids {
            insert_link_row(&tx, *event_id, contact_id)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn list_links(&self) -> RepoResult<Vec<(StoreId, StoreId)>> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, contact_id
             FROM events_contacts
             ORDER BY event_id ASC, contact_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push((row.get("event_id")?, row.get("contact_id")?));
        }
        Ok(links)
    }
}

// `Transaction` derefs to `Connection`, so this serves both paths.
fn insert_link_row(conn: &Connection, event_id: StoreId, contact_id: StoreId) -> RepoResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO events_contacts (event_id, contact_id) VALUES (?1, ?2);",
        params![event_id, contact_id],
    )?;
    Ok(())
}

fn query_id_set(conn: &Connection, sql: &str, id: StoreId) -> RepoResult<BTreeSet<StoreId>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([id])?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        ids.insert(row.get::<_, StoreId>(0)?);
    }
    Ok(ids)
}
