//! Structured file store for full calendar snapshots.
//!
//! # Responsibility
//! - Hold one consistent copy of all three collections (`CalendarSnapshot`).
//! - Load/save snapshots as XML files (`xml`).
//!
//! # Invariants
//! - Saving always overwrites the whole file; there are no partial writes.
//! - A loaded snapshot satisfies the Event/Contact symmetry invariant.

use crate::model::category::Category;
use crate::model::contact::Contact;
use crate::model::event::Event;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod xml;

pub use xml::{load_snapshot, XmlSnapshotStore};

/// Complete in-memory state of the calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    pub categories: Vec<Category>,
    pub events: Vec<Event>,
    pub contacts: Vec<Contact>,
}

impl CalendarSnapshot {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.events.is_empty() && self.contacts.is_empty()
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors from snapshot file IO and decoding.
#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Parse(roxmltree::Error),
    InvalidData(String),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "snapshot file error: {err}"),
            Self::Parse(err) => write!(f, "snapshot is not valid XML: {err}"),
            Self::InvalidData(message) => write!(f, "invalid snapshot data: {message}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<roxmltree::Error> for SnapshotError {
    fn from(value: roxmltree::Error) -> Self {
        Self::Parse(value)
    }
}
