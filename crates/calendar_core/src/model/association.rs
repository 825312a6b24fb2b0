//! Event/Contact association maintainer.
//!
//! # Responsibility
//! - Keep `Event::contacts` and `Contact::events` mutually consistent.
//! - Provide add/remove/replace/detach primitives over key-based links.
//!
//! # Invariants
//! - For every contact `c` and event `e`: `e.key ∈ c.events` iff
//!   `c.key ∈ e.contacts`, after every operation in this module.
//! - Add and remove are idempotent; each side is written only when the
//!   reference is absent (add) or present (remove).
//! - Replace operations resolve every requested key before mutating anything.

use super::contact::Contact;
use super::event::Event;
use super::RecordKey;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Replacement list references a record that is not in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationError {
    UnknownContact(RecordKey),
    UnknownEvent(RecordKey),
}

impl Display for AssociationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownContact(key) => write!(f, "contact not found: {key}"),
            Self::UnknownEvent(key) => write!(f, "event not found: {key}"),
        }
    }
}

impl Error for AssociationError {}

/// Links `contact` to `event` on both sides.
pub fn add_contact(event: &mut Event, contact: &mut Contact) {
    if !contact.events.contains(&event.key) {
        contact.events.push(event.key);
    }
    if !event.contacts.contains(&contact.key) {
        event.contacts.push(contact.key);
    }
}

/// Links `event` to `contact` on both sides.
pub fn add_event(contact: &mut Contact, event: &mut Event) {
    add_contact(event, contact);
}

/// Unlinks `contact` from `event` on both sides.
pub fn remove_contact(event: &mut Event, contact: &mut Contact) {
    contact.events.retain(|key| *key != event.key);
    event.contacts.retain(|key| *key != contact.key);
}

/// Unlinks `event` from `contact` on both sides.
pub fn remove_event(contact: &mut Contact, event: &mut Event) {
    remove_contact(event, contact);
}

/// Replaces the contact list of `event` with `new_keys`.
///
/// Contacts dropped from the list lose their reverse reference; contacts
/// added gain one; contacts kept are untouched.
///
/// # Errors
/// - Returns `UnknownContact` when a key in `new_keys` is not in `contacts`.
///   Nothing is mutated in that case.
pub fn replace_contacts(
    event: &mut Event,
    contacts: &mut [Contact],
    new_keys: &[RecordKey],
) -> Result<(), AssociationError> {
    if let Some(missing) = new_keys
        .iter()
        .find(|key| !contacts.iter().any(|contact| contact.key == **key))
    {
        return Err(AssociationError::UnknownContact(*missing));
    }

    let current = event.contacts.clone();
    for contact in contacts.iter_mut() {
        let was_linked = current.contains(&contact.key);
        let stays_linked = new_keys.contains(&contact.key);
        if was_linked && !stays_linked {
            remove_contact(event, contact);
        }
    }
    // Dangling keys (no matching contact) are dropped as well.
    event.contacts.retain(|key| new_keys.contains(key));

    for key in new_keys {
        if current.contains(key) {
            continue;
        }
        if let Some(contact) = contacts.iter_mut().find(|contact| contact.key == *key) {
            add_contact(event, contact);
        }
    }
    Ok(())
}

/// Replaces the event list of `contact` with `new_keys`.
///
/// # Errors
/// - Returns `UnknownEvent` when a key in `new_keys` is not in `events`.
///   Nothing is mutated in that case.
pub fn replace_events(
    contact: &mut Contact,
    events: &mut [Event],
    new_keys: &[RecordKey],
) -> Result<(), AssociationError> {
    if let Some(missing) = new_keys
        .iter()
        .find(|key| !events.iter().any(|event| event.key == **key))
    {
        return Err(AssociationError::UnknownEvent(*missing));
    }

    let current = contact.events.clone();
    for event in events.iter_mut() {
        let was_linked = current.contains(&event.key);
        let stays_linked = new_keys.contains(&event.key);
        if was_linked && !stays_linked {
            remove_event(contact, event);
        }
    }
    contact.events.retain(|key| new_keys.contains(key));

    for key in new_keys {
        if current.contains(key) {
            continue;
        }
        if let Some(event) = events.iter_mut().find(|event| event.key == *key) {
            add_event(contact, event);
        }
    }
    Ok(())
}

/// Removes every link of `event`, ahead of deleting it.
pub fn detach_event(event: &mut Event, contacts: &mut [Contact]) {
    for contact in contacts.iter_mut() {
        remove_contact(event, contact);
    }
    event.contacts.clear();
}

/// Removes every link of `contact`, ahead of deleting it.
pub fn detach_contact(contact: &mut Contact, events: &mut [Event]) {
    for event in events.iter_mut() {
        remove_event(contact, event);
    }
    contact.events.clear();
}

/// Rebuilds `Contact::events` from `Event::contacts`.
///
/// Used after loading collections where only one side of each link was
/// stored. Event-side keys that match no contact are dropped.
pub fn relink_from_events(events: &mut [Event], contacts: &mut [Contact]) {
    for contact in contacts.iter_mut() {
        contact.events.clear();
    }
    for event in events.iter_mut() {
        let requested = std::mem::take(&mut event.contacts);
        for key in requested {
            if let Some(contact) = contacts.iter_mut().find(|contact| contact.key == key) {
                add_contact(event, contact);
            }
        }
    }
}

/// Returns whether every link is present on both sides.
pub fn is_symmetric(events: &[Event], contacts: &[Contact]) -> bool {
    let events_ok = events.iter().all(|event| {
        event.contacts.iter().all(|key| {
            contacts
                .iter()
                .find(|contact| contact.key == *key)
                .is_some_and(|contact| contact.has_event(event.key))
        })
    });
    let contacts_ok = contacts.iter().all(|contact| {
        contact.events.iter().all(|key| {
            events
                .iter()
                .find(|event| event.key == *key)
                .is_some_and(|event| event.has_contact(contact.key))
        })
    });
    events_ok && contacts_ok
}
