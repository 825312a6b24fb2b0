//! Category repository contract and SQLite implementation.

use super::sqlite_store::{bool_to_int, parse_active_flag, SqliteStore};
use super::{RepoError, RepoResult};
use crate::model::StoreId;
use rusqlite::{params, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    category_name,
    color_hex,
    is_active
FROM categories";

/// Stored shape of one category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: StoreId,
    pub name: String,
    pub color_hex: String,
    pub is_active: bool,
}

/// Repository interface for category persistence.
pub trait CategoryRepository {
    /// Inserts an active row and returns the generated id. `row.id` is ignored.
    fn create_category(&self, row: &CategoryRow) -> RepoResult<StoreId>;
    /// Gets one row by id, active or not.
    fn get_category(&self, id: StoreId) -> RepoResult<Option<CategoryRow>>;
    /// Overwrites name and color. Does not change `is_active`.
    fn update_category(&self, row: &CategoryRow) -> RepoResult<()>;
    /// Lists active rows ordered by id.
    fn list_active_categories(&self) -> RepoResult<Vec<CategoryRow>>;
    /// Marks a row inactive.
    fn soft_delete_category(&self, id: StoreId) -> RepoResult<()>;
}

impl CategoryRepository for SqliteStore {
    fn create_category(&self, row: &CategoryRow) -> RepoResult<StoreId> {
        self.conn.execute(
            "INSERT INTO categories (category_name, color_hex, is_active)
             VALUES (?1, ?2, 1);",
            params![row.name.as_str(), row.color_hex.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_category(&self, id: StoreId) -> RepoResult<Option<CategoryRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn update_category(&self, row: &CategoryRow) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET
                category_name = ?1,
                color_hex = ?2
             WHERE id = ?3;",
            params![row.name.as_str(), row.color_hex.as_str(), row.id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "category",
                id: row.id,
            });
        }
        Ok(())
    }

    fn list_active_categories(&self) -> RepoResult<Vec<CategoryRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} WHERE is_active = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(true)])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn soft_delete_category(&self, id: StoreId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("UPDATE categories SET is_active = 0 WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "category",
                id,
            });
        }
        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<CategoryRow> {
    Ok(CategoryRow {
        id: row.get("id")?,
        name: row.get("category_name")?,
        color_hex: row.get("color_hex")?,
        is_active: parse_active_flag(row.get("is_active")?, "categories.is_active")?,
    })
}
