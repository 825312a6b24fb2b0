//! Core domain logic for the calendar.
//! This crate is the single source of truth for calendar invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod snapshot;

pub use config::{CalendarConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryDraft};
pub use model::contact::{Contact, ContactDraft};
pub use model::event::{Event, EventDraft, NotifyOffset};
pub use model::validation::ValidationError;
pub use model::{RecordKey, StoreId, UNASSIGNED_ID};
pub use repo::{CalendarStore, RepoError, RepoResult, SqliteStore};
pub use service::calendar_service::{
    CalendarError, CalendarResult, CalendarService, ContactSortKey, EventSortKey,
};
pub use service::reconcile::{ReconcileOutcome, ReconcileReport};
pub use service::reminder::{due_reminders, ReminderClock};
pub use snapshot::{load_snapshot, CalendarSnapshot, SnapshotError, XmlSnapshotStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
