//! Event record and notification offset.
//!
//! # Responsibility
//! - Define the scheduled-event record and its reminder arithmetic.
//!
//! # Invariants
//! - `date_time` has minute precision.
//! - `notify_offset` is a duration below 24 hours, not a clock time.
//! - `contacts` holds each contact key at most once; membership mirrors
//!   `Contact::events` (see `model::association`).

use super::validation::{
    normalize_text, parse_clock_time, require_non_blank, truncate_to_minute, ValidationError,
};
use super::{new_record_key, RecordKey, StoreId, UNASSIGNED_ID};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Display format for event dates.
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// How long before an event its reminder fires.
///
/// Serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotifyOffset {
    total_minutes: u32,
}

impl NotifyOffset {
    pub const ZERO: Self = Self { total_minutes: 0 };

    /// Builds an offset from hours and minutes.
    pub fn new(hours: u32, minutes: u32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTime(format!("{hours:02}:{minutes:02}"));
        let total_minutes = hours
            .checked_mul(60)
            .and_then(|total| total.checked_add(minutes))
            .ok_or_else(invalid)?;
        if minutes >= 60 || total_minutes >= MINUTES_PER_DAY {
            return Err(invalid());
        }
        Ok(Self { total_minutes })
    }

    /// Parses `H:MM`/`HH:MM`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let (hours, minutes) = parse_clock_time(value)?;
        Self::new(hours, minutes)
    }

    pub fn hours(self) -> u32 {
        self.total_minutes / 60
    }

    pub fn minutes(self) -> u32 {
        self.total_minutes % 60
    }

    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.total_minutes))
    }
}

impl Display for NotifyOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl TryFrom<String> for NotifyOffset {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NotifyOffset> for String {
    fn from(value: NotifyOffset) -> Self {
        value.to_string()
    }
}

/// Scheduled calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub key: RecordKey,
    pub id: StoreId,
    pub name: String,
    pub date_time: NaiveDateTime,
    pub notify_offset: NotifyOffset,
    pub location: String,
    pub description: String,
    /// Key of the owning category, if any.
    pub category: Option<RecordKey>,
    /// Associated contacts. Mutate only through `model::association`.
    pub contacts: Vec<RecordKey>,
}

/// User-supplied fields for creating or editing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date_time: NaiveDateTime,
    pub notify_offset: NotifyOffset,
    pub location: String,
    pub description: String,
    pub category: Option<RecordKey>,
    /// Full replacement list of associated contacts.
    pub contacts: Vec<RecordKey>,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, date_time: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            date_time,
            notify_offset: NotifyOffset::ZERO,
            location: String::new(),
            description: String::new(),
            category: None,
            contacts: Vec::new(),
        }
    }

    /// Returns the draft with a trimmed name, trimmed free text, minute
    /// precision and de-duplicated contact keys.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let mut contacts = Vec::with_capacity(self.contacts.len());
        for key in &self.contacts {
            if !contacts.contains(key) {
                contacts.push(*key);
            }
        }
        Ok(Self {
            name: require_non_blank("event name", &self.name)?,
            date_time: truncate_to_minute(self.date_time),
            notify_offset: self.notify_offset,
            location: normalize_text("location", &self.location)?,
            description: normalize_text("description", &self.description)?,
            category: self.category,
            contacts,
        })
    }
}

impl Event {
    /// Creates an unpersisted event without any contact links.
    ///
    /// Links in `draft.contacts` are applied by the caller through
    /// `model::association` so both sides stay consistent.
    pub fn from_draft(draft: &EventDraft) -> Self {
        Self {
            key: new_record_key(),
            id: UNASSIGNED_ID,
            name: draft.name.clone(),
            date_time: draft.date_time,
            notify_offset: draft.notify_offset,
            location: draft.location.clone(),
            description: draft.description.clone(),
            category: draft.category,
            contacts: Vec::new(),
        }
    }

    /// Overwrites scalar fields and category, keeping identity and links.
    pub fn apply(&mut self, draft: &EventDraft) {
        self.name = draft.name.clone();
        self.date_time = draft.date_time;
        self.notify_offset = draft.notify_offset;
        self.location = draft.location.clone();
        self.description = draft.description.clone();
        self.category = draft.category;
    }

    pub fn has_contact(&self, contact: RecordKey) -> bool {
        self.contacts.contains(&contact)
    }

    /// Instant at which the reminder for this event fires.
    pub fn reminder_at(&self) -> NaiveDateTime {
        self.date_time - self.notify_offset.as_duration()
    }

    pub fn formatted_date(&self) -> String {
        self.date_time.format(DISPLAY_DATE_FORMAT).to_string()
    }

    pub fn formatted_reminder(&self) -> String {
        self.reminder_at().format(DISPLAY_DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn notify_offset_parses_and_displays_padded() {
        let offset = NotifyOffset::parse("1:05").unwrap();
        assert_eq!(offset.hours(), 1);
        assert_eq!(offset.minutes(), 5);
        assert_eq!(offset.to_string(), "01:05");
        assert!(NotifyOffset::new(24, 0).is_err());
        assert!(NotifyOffset::new(1, 60).is_err());
    }

    #[test]
    fn notify_offset_rejects_overflowing_hours() {
        assert!(matches!(
            NotifyOffset::new(u32::MAX, 0),
            Err(ValidationError::InvalidTime(_))
        ));
        assert!(matches!(
            NotifyOffset::new(71_582_788, u32::MAX),
            Err(ValidationError::InvalidTime(_))
        ));
    }

    #[test]
    fn draft_normalization_rejects_control_characters() {
        let mut draft = EventDraft::new("Standup", at(9, 0));
        draft.location = "Room\u{1b}[0m".to_string();
        assert_eq!(
            draft.normalized().unwrap_err(),
            ValidationError::ControlCharacter("location")
        );
    }

    #[test]
    fn reminder_subtracts_offset_across_midnight() {
        let mut event = Event::from_draft(&EventDraft::new("Early call", at(0, 30)));
        event.notify_offset = NotifyOffset::new(1, 0).unwrap();
        assert_eq!(event.formatted_reminder(), "09.01.2025 23:30");
        assert_eq!(event.formatted_date(), "10.01.2025 00:30");
    }

    #[test]
    fn draft_normalization_truncates_seconds_and_dedups_contacts() {
        let contact = new_record_key();
        let mut draft = EventDraft::new("  Standup ", at(9, 0) + Duration::seconds(42));
        draft.contacts = vec![contact, contact];
        let normalized = draft.normalized().unwrap();
        assert_eq!(normalized.name, "Standup");
        assert_eq!(normalized.date_time, at(9, 0));
        assert_eq!(normalized.contacts, vec![contact]);
    }
}
