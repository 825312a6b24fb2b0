//! Contact repository contract and SQLite implementation.

use super::sqlite_store::{bool_to_int, parse_active_flag, SqliteStore};
use super::{RepoError, RepoResult};
use crate::model::StoreId;
use rusqlite::{params, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    phone_number,
    is_active
FROM contacts";

/// Stored shape of one contact row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub id: StoreId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub is_active: bool,
}

/// Repository interface for contact persistence.
pub trait ContactRepository {
    /// Inserts an active row and returns the generated id. `row.id` is ignored.
    fn create_contact(&self, row: &ContactRow) -> RepoResult<StoreId>;
    /// Gets one row by id, active or not.
    fn get_contact(&self, id: StoreId) -> RepoResult<Option<ContactRow>>;
    /// Overwrites names and phone number. Does not change `is_active`.
    fn update_contact(&self, row: &ContactRow) -> RepoResult<()>;
    /// Lists active rows ordered by id.
    fn list_active_contacts(&self) -> RepoResult<Vec<ContactRow>>;
    /// Marks a row inactive.
    fn soft_delete_contact(&self, id: StoreId) -> RepoResult<()>;
}

impl ContactRepository for SqliteStore {
    fn create_contact(&self, row: &ContactRow) -> RepoResult<StoreId> {
        self.conn.execute(
            "INSERT INTO contacts (first_name, last_name, phone_number, is_active)
             VALUES (?1, ?2, ?3, 1);",
            params![
                row.first_name.as_str(),
                row.last_name.as_str(),
                row.phone_number.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_contact(&self, id: StoreId) -> RepoResult<Option<ContactRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn update_contact(&self, row: &ContactRow) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                first_name = ?1,
                last_name = ?2,
                phone_number = ?3
             WHERE id = ?4;",
            params![
                row.first_name.as_str(),
                row.last_name.as_str(),
                row.phone_number.as_str(),
                row.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "contact",
                id: row.id,
            });
        }
        Ok(())
    }

    fn list_active_contacts(&self) -> RepoResult<Vec<ContactRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL} WHERE is_active = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(true)])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn soft_delete_contact(&self, id: StoreId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE contacts SET is_active = 0 WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "contact",
                id,
            });
        }
        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<ContactRow> {
    Ok(ContactRow {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone_number: row.get("phone_number")?,
        is_active: parse_active_flag(row.get("is_active")?, "contacts.is_active")?,
    })
}
