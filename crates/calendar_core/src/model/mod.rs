//! Domain model for categories, events and contacts.
//!
//! # Responsibility
//! - Define the canonical in-memory records shared by services and stores.
//! - Keep the Event/Contact association symmetric (`association`).
//!
//! # Invariants
//! - Every record carries a stable `RecordKey` that never changes or repeats.
//! - `id == UNASSIGNED_ID` means the record was never written to the database.
//! - In-memory relationships reference records by `RecordKey`, never by `StoreId`.

use uuid::Uuid;

pub mod association;
pub mod category;
pub mod contact;
pub mod event;
pub mod validation;

/// Stable in-memory identity of a record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordKey = Uuid;

/// Database identifier. `UNASSIGNED_ID` until the first successful insert.
pub type StoreId = i64;

/// Marker id for records that were never persisted.
pub const UNASSIGNED_ID: StoreId = 0;

/// Returns whether `id` was assigned by the database.
pub fn is_persisted(id: StoreId) -> bool {
    id != UNASSIGNED_ID
}

/// Generates a fresh record key.
pub fn new_record_key() -> RecordKey {
    Uuid::new_v4()
}
