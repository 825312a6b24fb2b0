//! Contact record.
//!
//! # Invariants
//! - `phone_number` is stored in canonical `XXX XXX XXX` form.
//! - `events` holds each event key at most once; membership mirrors
//!   `Event::contacts` (see `model::association`).

use super::validation::{format_phone_number, require_non_blank, ValidationError};
use super::{new_record_key, RecordKey, StoreId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Person that can be attached to events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub key: RecordKey,
    pub id: StoreId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    /// Associated events. Mutate only through `model::association`.
    pub events: Vec<RecordKey>,
}

/// User-supplied fields for creating or editing a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    /// Full replacement list of associated events.
    pub events: Vec<RecordKey>,
}

impl ContactDraft {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            events: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<RecordKey>) -> Self {
        self.events = events;
        self
    }

    /// Returns the draft with trimmed names and a canonical phone number.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let mut events = Vec::with_capacity(self.events.len());
        for key in &self.events {
            if !events.contains(key) {
                events.push(*key);
            }
        }
        Ok(Self {
            first_name: require_non_blank("first name", &self.first_name)?,
            last_name: require_non_blank("last name", &self.last_name)?,
            phone_number: format_phone_number(&self.phone_number)?,
            events,
        })
    }
}

impl Contact {
    /// Creates an unpersisted contact without any event links.
    ///
    /// Links in `draft.events` are applied by the caller through
    /// `model::association` so both sides stay consistent.
    pub fn from_draft(draft: &ContactDraft) -> Self {
        Self {
            key: new_record_key(),
            id: UNASSIGNED_ID,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            phone_number: draft.phone_number.clone(),
            events: Vec::new(),
        }
    }

    /// Overwrites scalar fields, keeping identity and links.
    pub fn apply(&mut self, draft: &ContactDraft) {
        self.first_name = draft.first_name.clone();
        self.last_name = draft.last_name.clone();
        self.phone_number = draft.phone_number.clone();
    }

    pub fn has_event(&self, event: RecordKey) -> bool {
        self.events.contains(&event)
    }
}

impl Display for Contact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} | {}",
            self.first_name, self.last_name, self.phone_number
        )
    }
}
