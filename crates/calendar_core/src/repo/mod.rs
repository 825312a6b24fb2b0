//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts keyed by `StoreId`.
//! - Isolate SQL details from reconciliation and facade orchestration.
//!
//! # Invariants
//! - Deletes through repositories are soft (`is_active = 0`); only
//!   `EventRepository::purge_events_before` removes rows physically.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Read paths reject invalid persisted values instead of masking them.

use crate::db::DbError;
use crate::model::StoreId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod contact_repo;
pub mod event_repo;
pub mod link_repo;
pub mod sqlite_store;

pub use category_repo::{CategoryRepository, CategoryRow};
pub use contact_repo::{ContactRepository, ContactRow};
pub use event_repo::{EventRepository, EventRow};
pub use link_repo::LinkRepository;
pub use sqlite_store::SqliteStore;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for calendar persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: StoreId },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found in store: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted calendar data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Full persistent-store contract consumed by reconciliation and the facade.
pub trait CalendarStore:
    CategoryRepository + EventRepository + ContactRepository + LinkRepository
{
}

impl<T> CalendarStore for T where
    T: CategoryRepository + EventRepository + ContactRepository + LinkRepository
{
}
