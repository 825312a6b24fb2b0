//! Calendar facade over in-memory collections, the store and the snapshot.
//!
//! # Responsibility
//! - Own the category, event and contact collections.
//! - Validate drafts and uniqueness before any mutation.
//! - Push every mutation to the attached store through `service::reconcile`.
//! - Run startup synchronization between the snapshot file and the store.
//!
//! # Invariants
//! - Event/contact links stay symmetric after every public operation.
//! - Validation failures leave memory and store untouched.
//! - Store failures leave memory mutated; the next reconciliation retries.
//! - Without a store (file-only mode) every mutation is memory-only.

use crate::model::association::{
    add_contact, detach_contact, detach_event, relink_from_events, remove_contact,
    replace_contacts, replace_events, AssociationError,
};
use crate::model::category::{Category, CategoryDraft};
use crate::model::contact::{Contact, ContactDraft};
use crate::model::event::{Event, EventDraft};
use crate::model::validation::{normalize_phone_number, truncate_to_minute, ValidationError};
use crate::model::{is_persisted, new_record_key, RecordKey, StoreId};
use crate::repo::{CalendarStore, CategoryRow, ContactRow, EventRow, RepoError, RepoResult};
use crate::service::reconcile::{
    reconcile_all, reconcile_category, reconcile_contact, reconcile_event, ReconcileReport,
};
use crate::snapshot::{CalendarSnapshot, SnapshotError, XmlSnapshotStore};
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Instant;

/// Facade error.
#[derive(Debug)]
pub enum CalendarError {
    /// Draft format or uniqueness violation. Nothing was changed.
    Validation(ValidationError),
    /// Referenced record does not exist.
    NotFound {
        entity: &'static str,
        reference: String,
    },
    /// Store failure. Memory already holds the change.
    Store(RepoError),
    /// Snapshot file could not be read or written.
    Snapshot(SnapshotError),
}

impl CalendarError {
    fn not_found(entity: &'static str, reference: impl ToString) -> Self {
        Self::NotFound {
            entity,
            reference: reference.to_string(),
        }
    }
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, reference } => write!(f, "{entity} not found: {reference}"),
            Self::Store(err) => write!(f, "store error: {err}"),
            Self::Snapshot(err) => write!(f, "snapshot error: {err}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for CalendarError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CalendarError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<SnapshotError> for CalendarError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<AssociationError> for CalendarError {
    fn from(value: AssociationError) -> Self {
        match value {
            AssociationError::UnknownContact(key) => Self::not_found("contact", key),
            AssociationError::UnknownEvent(key) => Self::not_found("event", key),
        }
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Event ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventSortKey {
    Name,
    #[default]
    Date,
    Location,
    Description,
    /// Category name; uncategorized events last.
    Category,
}

impl FromStr for EventSortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            "location" => Ok(Self::Location),
            "description" => Ok(Self::Description),
            "category" => Ok(Self::Category),
            other => Err(format!("unknown event sort key `{other}`")),
        }
    }
}

/// Contact ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactSortKey {
    #[default]
    FirstName,
    LastName,
    PhoneNumber,
}

impl FromStr for ContactSortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "first-name" | "first_name" => Ok(Self::FirstName),
            "last" | "last-name" | "last_name" => Ok(Self::LastName),
            "phone" | "phone-number" | "phone_number" => Ok(Self::PhoneNumber),
            other => Err(format!("unknown contact sort key `{other}`")),
        }
    }
}

/// Calendar facade.
pub struct CalendarService<S: CalendarStore> {
    categories: Vec<Category>,
    events: Vec<Event>,
    contacts: Vec<Contact>,
    store: Option<S>,
    snapshot: Option<XmlSnapshotStore>,
}

impl<S: CalendarStore> CalendarService<S> {
    /// Creates an empty facade. `None` runs in file-only mode.
    pub fn new(store: Option<S>) -> Self {
        Self {
            categories: Vec::new(),
            events: Vec::new(),
            contacts: Vec::new(),
            store,
            snapshot: None,
        }
    }

    /// Creates a facade over already loaded collections.
    ///
    /// Event-side links are authoritative; contact-side links are rebuilt.
    pub fn from_snapshot(store: Option<S>, snapshot: CalendarSnapshot) -> Self {
        let mut service = Self::new(store);
        service.categories = snapshot.categories;
        service.events = snapshot.events;
        service.contacts = snapshot.contacts;
        relink_from_events(&mut service.events, &mut service.contacts);
        service
    }

    /// Loads the snapshot file, synchronizes with `store` and saves the
    /// merged result back to the file.
    ///
    /// A store failure during synchronization is logged and the facade
    /// continues in file-only mode.
    ///
    /// # Errors
    /// - `Snapshot` when the file exists but cannot be read, parsed or
    ///   written.
    pub fn open(store: Option<S>, snapshot_store: XmlSnapshotStore) -> CalendarResult<Self> {
        let started_at = Instant::now();
        let loaded = snapshot_store.load()?.unwrap_or_default();
        let mut service = Self::from_snapshot(store, loaded);
        service.snapshot = Some(snapshot_store);

        if service.store.is_some() {
            if let Err(err) = service.synchronize() {
                warn!(
                    "event=calendar_open module=service status=degraded mode=file_only error={}",
                    err
                );
                service.store = None;
            }
        }

        service.save_snapshot()?;
        info!(
            "event=calendar_open module=service status=ok duration_ms={} store_attached={} categories={} events={} contacts={}",
            started_at.elapsed().as_millis(),
            service.store.is_some(),
            service.categories.len(),
            service.events.len(),
            service.contacts.len()
        );
        Ok(service)
    }

    /// Reconciles every record into the store, then reloads active rows.
    ///
    /// Records whose id is already known keep their in-memory key.
    pub fn synchronize(&mut self) -> CalendarResult<ReconcileReport> {
        let Some(store) = self.store.as_mut() else {
            return Ok(ReconcileReport::default());
        };
        let report = reconcile_all(
            store,
            &mut self.categories,
            &mut self.events,
            &mut self.contacts,
        )?;
        self.reload_from_store()?;
        Ok(report)
    }

    /// Writes all collections to the snapshot file, if one is bound.
    pub fn save_snapshot(&self) -> CalendarResult<()> {
        if let Some(snapshot_store) = &self.snapshot {
            snapshot_store.save(&self.snapshot())?;
        }
        Ok(())
    }

    /// Copies the current collections.
    pub fn snapshot(&self) -> CalendarSnapshot {
        CalendarSnapshot {
            categories: self.categories.clone(),
            events: self.events.clone(),
            contacts: self.contacts.clone(),
        }
    }

    pub fn is_store_attached(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn snapshot_store(&self) -> Option<&XmlSnapshotStore> {
        self.snapshot.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn category(&self, key: RecordKey) -> Option<&Category> {
        self.categories.iter().find(|category| category.key == key)
    }

    pub fn event(&self, key: RecordKey) -> Option<&Event> {
        self.events.iter().find(|event| event.key == key)
    }

    pub fn contact(&self, key: RecordKey) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.key == key)
    }

    pub fn category_by_id(&self, id: StoreId) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| is_persisted(id) && category.id == id)
    }

    pub fn event_by_id(&self, id: StoreId) -> Option<&Event> {
        self.events
            .iter()
            .find(|event| is_persisted(id) && event.id == id)
    }

    pub fn contact_by_id(&self, id: StoreId) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|contact| is_persisted(id) && contact.id == id)
    }

    /// Events whose date part equals `date`, in collection order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.date_time.date() == date)
            .collect()
    }

    /// Category display name for `event`, if it has a category.
    pub fn category_name_of(&self, event: &Event) -> Option<&str> {
        event
            .category
            .and_then(|key| self.category(key))
            .map(|category| category.name.as_str())
    }

    /// Whether another category already uses `name` (trimmed, case-insensitive).
    pub fn category_name_exists(&self, name: &str, except: Option<RecordKey>) -> bool {
        let name = name.trim().to_lowercase();
        self.categories
            .iter()
            .filter(|category| Some(category.key) != except)
            .any(|category| category.name.to_lowercase() == name)
    }

    /// Whether another event is scheduled at the same minute.
    pub fn date_time_occupied(&self, date_time: NaiveDateTime, except: Option<RecordKey>) -> bool {
        let date_time = truncate_to_minute(date_time);
        self.events
            .iter()
            .filter(|event| Some(event.key) != except)
            .any(|event| event.date_time == date_time)
    }

    /// Whether another contact has the same phone number, ignoring spacing.
    pub fn phone_number_exists(&self, phone_number: &str, except: Option<RecordKey>) -> bool {
        let digits = normalize_phone_number(phone_number);
        self.contacts
            .iter()
            .filter(|contact| Some(contact.key) != except)
            .any(|contact| normalize_phone_number(&contact.phone_number) == digits)
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> CalendarResult<RecordKey> {
        let draft = draft.normalized()?;
        if self.category_name_exists(&draft.name, None) {
            return Err(ValidationError::DuplicateCategoryName(draft.name).into());
        }

        let category = Category::from_draft(draft);
        let key = category.key;
        self.categories.push(category);
        self.persist_category(key)?;
        Ok(key)
    }

    pub fn update_category(&mut self, key: RecordKey, draft: CategoryDraft) -> CalendarResult<()> {
        let index = self.category_index(key)?;
        let draft = draft.normalized()?;
        if self.category_name_exists(&draft.name, Some(key)) {
            return Err(ValidationError::DuplicateCategoryName(draft.name).into());
        }

        self.categories[index].apply(draft);
        self.persist_category(key)
    }

    /// Removes a category. Events that used it become uncategorized.
    pub fn delete_category(&mut self, key: RecordKey) -> CalendarResult<()> {
        let index = self.category_index(key)?;
        let category = self.categories.remove(index);

        let mut orphaned = Vec::new();
        for event in &mut self.events {
            if event.category == Some(key) {
                event.category = None;
                orphaned.push(event.key);
            }
        }

        if let Some(store) = self.store.as_mut() {
            for event_key in orphaned {
                if let Some(event) = self.events.iter_mut().find(|event| event.key == event_key) {
                    if is_persisted(event.id) {
                        reconcile_event(store, event, &self.categories, &self.contacts)?;
                    }
                }
            }
            if is_persisted(category.id) {
                store.soft_delete_category(category.id)?;
            }
        }
        Ok(())
    }

    pub fn add_event(&mut self, draft: EventDraft) -> CalendarResult<RecordKey> {
        let draft = draft.normalized()?;
        self.check_event_refs(&draft)?;
        if self.date_time_occupied(draft.date_time, None) {
            return Err(ValidationError::DateTimeOccupied(draft.date_time).into());
        }

        let event = Event::from_draft(&draft);
        let key = event.key;
        self.events.push(event);
        let index = self.events.len() - 1;
        replace_contacts(&mut self.events[index], &mut self.contacts, &draft.contacts)?;
        self.persist_event(key)?;
        Ok(key)
    }

    /// Overwrites an event; `draft.contacts` replaces its contact list.
    pub fn update_event(&mut self, key: RecordKey, draft: EventDraft) -> CalendarResult<()> {
        let index = self.event_index(key)?;
        let draft = draft.normalized()?;
        self.check_event_refs(&draft)?;
        if self.date_time_occupied(draft.date_time, Some(key)) {
            return Err(ValidationError::DateTimeOccupied(draft.date_time).into());
        }

        let event = &mut self.events[index];
        event.apply(&draft);
        replace_contacts(event, &mut self.contacts, &draft.contacts)?;
        self.persist_event(key)
    }

    pub fn delete_event(&mut self, key: RecordKey) -> CalendarResult<()> {
        let index = self.event_index(key)?;
        let mut event = self.events.remove(index);
        detach_event(&mut event, &mut self.contacts);

        if let Some(store) = self.store.as_mut() {
            if is_persisted(event.id) {
                store.replace_event_links(event.id, &BTreeSet::new())?;
                store.soft_delete_event(event.id)?;
            }
        }
        Ok(())
    }

    /// Permanently removes every event dated before the start of `date`.
    ///
    /// Returns the number of events removed from memory.
    pub fn purge_events_before(&mut self, date: NaiveDate) -> CalendarResult<usize> {
        let cutoff = date.and_time(chrono::NaiveTime::MIN);
        let mut removed = 0;
        let mut index = 0;
        while index < self.events.len() {
            if self.events[index].date_time < cutoff {
                let mut event = self.events.remove(index);
                detach_event(&mut event, &mut self.contacts);
                removed += 1;
            } else {
                index += 1;
            }
        }

        if let Some(store) = self.store.as_mut() {
            let purged = store.purge_events_before(cutoff)?;
            info!(
                "event=purge_events module=service status=ok removed={} purged_rows={}",
                removed, purged
            );
        }
        Ok(removed)
    }

    pub fn add_contact(&mut self, draft: ContactDraft) -> CalendarResult<RecordKey> {
        let draft = draft.normalized()?;
        self.check_contact_refs(&draft)?;
        if self.phone_number_exists(&draft.phone_number, None) {
            return Err(ValidationError::DuplicatePhoneNumber(draft.phone_number).into());
        }

        let contact = Contact::from_draft(&draft);
        let key = contact.key;
        self.contacts.push(contact);
        let index = self.contacts.len() - 1;
        replace_events(&mut self.contacts[index], &mut self.events, &draft.events)?;
        self.persist_contact(key)?;
        Ok(key)
    }

    /// Overwrites a contact; `draft.events` replaces its event list.
    pub fn update_contact(&mut self, key: RecordKey, draft: ContactDraft) -> CalendarResult<()> {
        let index = self.contact_index(key)?;
        let draft = draft.normalized()?;
        self.check_contact_refs(&draft)?;
        if self.phone_number_exists(&draft.phone_number, Some(key)) {
            return Err(ValidationError::DuplicatePhoneNumber(draft.phone_number).into());
        }

        let contact = &mut self.contacts[index];
        contact.apply(&draft);
        replace_events(contact, &mut self.events, &draft.events)?;
        self.persist_contact(key)
    }

    pub fn delete_contact(&mut self, key: RecordKey) -> CalendarResult<()> {
        let index = self.contact_index(key)?;
        let mut contact = self.contacts.remove(index);
        detach_contact(&mut contact, &mut self.events);

        if let Some(store) = self.store.as_mut() {
            if is_persisted(contact.id) {
                store.replace_contact_links(contact.id, &BTreeSet::new())?;
                store.soft_delete_contact(contact.id)?;
            }
        }
        Ok(())
    }

    /// Links an event and a contact on both sides. Linking twice is a no-op.
    pub fn link(&mut self, event_key: RecordKey, contact_key: RecordKey) -> CalendarResult<()> {
        let event_index = self.event_index(event_key)?;
        let contact_index = self.contact_index(contact_key)?;
        add_contact(
            &mut self.events[event_index],
            &mut self.contacts[contact_index],
        );
        self.persist_event(event_key)
    }

    pub fn unlink(&mut self, event_key: RecordKey, contact_key: RecordKey) -> CalendarResult<()> {
        let event_index = self.event_index(event_key)?;
        let contact_index = self.contact_index(contact_key)?;
        remove_contact(
            &mut self.events[event_index],
            &mut self.contacts[contact_index],
        );
        self.persist_event(event_key)
    }

    /// Sorts events in place. Ties keep their current order.
    pub fn sort_events(&mut self, sort_key: EventSortKey) {
        let category_names: Vec<(RecordKey, String)> = self
            .categories
            .iter()
            .map(|category| (category.key, category.name.to_lowercase()))
            .collect();

        self.events.sort_by(|left, right| match sort_key {
            EventSortKey::Name => compare_text(&left.name, &right.name),
            EventSortKey::Date => left.date_time.cmp(&right.date_time),
            EventSortKey::Location => compare_text(&left.location, &right.location),
            EventSortKey::Description => compare_text(&left.description, &right.description),
            EventSortKey::Category => match (
                sort_name(&category_names, left.category),
                sort_name(&category_names, right.category),
            ) {
                (Some(l), Some(r)) => l.cmp(r),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        });
    }

    pub fn sort_contacts(&mut self, sort_key: ContactSortKey) {
        self.contacts.sort_by(|left, right| match sort_key {
            ContactSortKey::FirstName => compare_text(&left.first_name, &right.first_name),
            ContactSortKey::LastName => compare_text(&left.last_name, &right.last_name),
            ContactSortKey::PhoneNumber => left.phone_number.cmp(&right.phone_number),
        });
    }

    pub fn sort_categories(&mut self) {
        self.categories
            .sort_by(|left, right| compare_text(&left.name, &right.name));
    }

    fn category_index(&self, key: RecordKey) -> CalendarResult<usize> {
        self.categories
            .iter()
            .position(|category| category.key == key)
            .ok_or_else(|| CalendarError::not_found("category", key))
    }

    fn event_index(&self, key: RecordKey) -> CalendarResult<usize> {
        self.events
            .iter()
            .position(|event| event.key == key)
            .ok_or_else(|| CalendarError::not_found("event", key))
    }

    fn contact_index(&self, key: RecordKey) -> CalendarResult<usize> {
        self.contacts
            .iter()
            .position(|contact| contact.key == key)
            .ok_or_else(|| CalendarError::not_found("contact", key))
    }

    fn check_event_refs(&self, draft: &EventDraft) -> CalendarResult<()> {
        if let Some(category) = draft.category {
            self.category_index(category)?;
        }
        for contact in &draft.contacts {
            self.contact_index(*contact)?;
        }
        Ok(())
    }

    fn check_contact_refs(&self, draft: &ContactDraft) -> CalendarResult<()> {
        for event in &draft.events {
            self.event_index(*event)?;
        }
        Ok(())
    }

    fn persist_category(&mut self, key: RecordKey) -> CalendarResult<()> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        if let Some(category) = self.categories.iter_mut().find(|c| c.key == key) {
            reconcile_category(store, category)?;
        }
        Ok(())
    }

    fn persist_event(&mut self, key: RecordKey) -> CalendarResult<()> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        if let Some(event) = self.events.iter_mut().find(|e| e.key == key) {
            reconcile_event(store, event, &self.categories, &self.contacts)?;
        }
        Ok(())
    }

    fn persist_contact(&mut self, key: RecordKey) -> CalendarResult<()> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        if let Some(contact) = self.contacts.iter_mut().find(|c| c.key == key) {
            reconcile_contact(store, contact, &self.events)?;
        }
        Ok(())
    }

    fn reload_from_store(&mut self) -> RepoResult<()> {
        let Some(store) = self.store.as_ref() else {
            return Ok(());
        };
        let category_rows = store.list_active_categories()?;
        let event_rows = store.list_active_events()?;
        let contact_rows = store.list_active_contacts()?;
        let links = store.list_links()?;

        let categories: Vec<Category> = category_rows
            .into_iter()
            .map(|row| category_from_row(row, &self.categories))
            .collect();
        let mut events: Vec<Event> = event_rows
            .into_iter()
            .map(|row| event_from_row(row, &self.events, &categories))
            .collect();
        let mut contacts: Vec<Contact> = contact_rows
            .into_iter()
            .map(|row| contact_from_row(row, &self.contacts))
            .collect();

        for (event_id, contact_id) in links {
            let contact_key = contacts
                .iter()
                .find(|contact| contact.id == contact_id)
                .map(|contact| contact.key);
            let event = events.iter_mut().find(|event| event.id == event_id);
            if let (Some(event), Some(contact_key)) = (event, contact_key) {
                if !event.contacts.contains(&contact_key) {
                    event.contacts.push(contact_key);
                }
            }
        }
        relink_from_events(&mut events, &mut contacts);

        self.categories = categories;
        self.events = events;
        self.contacts = contacts;
        Ok(())
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

fn sort_name(names: &[(RecordKey, String)], category: Option<RecordKey>) -> Option<&str> {
    let category = category?;
    names
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, name)| name.as_str())
}

// Keeps the in-memory key of a record the store already knew about.
fn key_for_id<T>(
    records: &[T],
    id: StoreId,
    identity: impl Fn(&T) -> (StoreId, RecordKey),
) -> RecordKey {
    records
        .iter()
        .map(identity)
        .find(|(known_id, _)| *known_id == id)
        .map(|(_, key)| key)
        .unwrap_or_else(new_record_key)
}

fn category_from_row(row: CategoryRow, known: &[Category]) -> Category {
    Category {
        key: key_for_id(known, row.id, |c| (c.id, c.key)),
        id: row.id,
        name: row.name,
        color_hex: row.color_hex,
    }
}

fn event_from_row(row: EventRow, known: &[Event], categories: &[Category]) -> Event {
    let category = row.category_id.and_then(|category_id| {
        categories
            .iter()
            .find(|category| category.id == category_id)
            .map(|category| category.key)
    });
    Event {
        key: key_for_id(known, row.id, |e| (e.id, e.key)),
        id: row.id,
        name: row.name,
        date_time: row.date_time,
        notify_offset: row.notify_offset,
        location: row.location,
        description: row.description,
        category,
        contacts: Vec::new(),
    }
}

fn contact_from_row(row: ContactRow, known: &[Contact]) -> Contact {
    Contact {
        key: key_for_id(known, row.id, |c| (c.id, c.key)),
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        phone_number: row.phone_number,
        events: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_parse_case_insensitively() {
        assert_eq!("Category".parse::<EventSortKey>(), Ok(EventSortKey::Category));
        assert_eq!("last".parse::<ContactSortKey>(), Ok(ContactSortKey::LastName));
        assert!("weekday".parse::<EventSortKey>().is_err());
        assert_eq!(EventSortKey::default(), EventSortKey::Date);
        assert_eq!(ContactSortKey::default(), ContactSortKey::FirstName);
    }

    #[test]
    fn association_errors_map_to_not_found() {
        let key = new_record_key();
        let err = CalendarError::from(AssociationError::UnknownEvent(key));
        assert_eq!(err.to_string(), format!("event not found: {key}"));
    }
}
