//! Insert-vs-update reconciliation between in-memory records and the store.
//!
//! # Responsibility
//! - Decide per record whether a write is a create or an update.
//! - Write generated store ids back into the in-memory record.
//! - Keep link rows equal to the in-memory association set (full replace).
//!
//! # Invariants
//! - A record is inserted at most once per call; its `id` is assigned
//!   before the call returns.
//! - Updates are issued only when at least one stored field differs.
//! - Link rows are only written for partners that are already persisted;
//!   the partner writes the row when it is inserted later.
//! - A failure aborts the current record only. Earlier records in the same
//!   pass stay reconciled.

use crate::model::category::Category;
use crate::model::contact::Contact;
use crate::model::event::Event;
use crate::model::{is_persisted, RecordKey, StoreId};
use crate::repo::{CalendarStore, CategoryRow, ContactRow, EventRow, RepoResult};
use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use std::time::Instant;

/// What reconciliation did with one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record was new (or lost by the store) and received this id.
    Inserted(StoreId),
    /// Stored fields or links differed and were rewritten.
    Updated,
    /// Store already matched the record.
    Unchanged,
}

/// Per-pass counters returned by `reconcile_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ReconcileReport {
    fn record(&mut self, outcome: ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Inserted(_) => self.inserted += 1,
            ReconcileOutcome::Updated => self.updated += 1,
            ReconcileOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Reconciles one category.
pub fn reconcile_category<S>(store: &mut S, category: &mut Category) -> RepoResult<ReconcileOutcome>
where
    S: CalendarStore + ?Sized,
{
    let desired = CategoryRow {
        id: category.id,
        name: category.name.clone(),
        color_hex: category.color_hex.clone(),
        is_active: true,
    };

    if is_persisted(category.id) {
        if let Some(stored) = store.get_category(category.id)? {
            if stored.name == desired.name && stored.color_hex == desired.color_hex {
                return Ok(ReconcileOutcome::Unchanged);
            }
            store.update_category(&desired)?;
            debug!(
                "event=reconcile module=service status=ok entity=category outcome=updated id={}",
                category.id
            );
            return Ok(ReconcileOutcome::Updated);
        }
        warn!(
            "event=reconcile module=service status=reinsert entity=category stale_id={}",
            category.id
        );
    }

    let id = store.create_category(&desired)?;
    category.id = id;
    debug!(
        "event=reconcile module=service status=ok entity=category outcome=inserted key={} id={}",
        category.key, id
    );
    Ok(ReconcileOutcome::Inserted(id))
}

/// Reconciles one event, resolving its category and contact keys against
/// the given collections.
pub fn reconcile_event<S>(
    store: &mut S,
    event: &mut Event,
    categories: &[Category],
    contacts: &[Contact],
) -> RepoResult<ReconcileOutcome>
where
    S: CalendarStore + ?Sized,
{
    let category_id = event.category.and_then(|key| {
        categories
            .iter()
            .find(|category| category.key == key)
            .map(|category| category.id)
            .filter(|id| is_persisted(*id))
    });
    let contact_ids = persisted_ids(&event.contacts, contacts.iter().map(|c| (c.key, c.id)));
    let desired = EventRow {
        id: event.id,
        name: event.name.clone(),
        date_time: event.date_time,
        notify_offset: event.notify_offset,
        location: event.location.clone(),
        description: event.description.clone(),
        category_id,
        is_active: true,
    };

    if is_persisted(event.id) {
        if let Some(stored) = store.get_event(event.id)? {
            let fields_changed = stored.name != desired.name
                || stored.date_time != desired.date_time
                || stored.notify_offset != desired.notify_offset
                || stored.location != desired.location
                || stored.description != desired.description
                || stored.category_id != desired.category_id;
            if fields_changed {
                store.update_event(&desired)?;
            }
            let links_changed = store.event_contact_ids(event.id)? != contact_ids;
            if links_changed {
                store.replace_event_links(event.id, &contact_ids)?;
            }
            if !fields_changed && !links_changed {
                return Ok(ReconcileOutcome::Unchanged);
            }
            debug!(
                "event=reconcile module=service status=ok entity=event outcome=updated id={} fields_changed={} links_changed={}",
                event.id, fields_changed, links_changed
            );
            return Ok(ReconcileOutcome::Updated);
        }
        warn!(
            "event=reconcile module=service status=reinsert entity=event stale_id={}",
            event.id
        );
    }

    let id = store.create_event(&desired)?;
    event.id = id;
    for contact_id in &contact_ids {
        store.insert_link(id, *contact_id)?;
    }
    debug!(
        "event=reconcile module=service status=ok entity=event outcome=inserted key={} id={} links={}",
        event.key,
        id,
        contact_ids.len()
    );
    Ok(ReconcileOutcome::Inserted(id))
}

/// Reconciles one contact, resolving its event keys against `events`.
pub fn reconcile_contact<S>(
    store: &mut S,
    contact: &mut Contact,
    events: &[Event],
) -> RepoResult<ReconcileOutcome>
where
    S: CalendarStore + ?Sized,
{
    let event_ids = persisted_ids(&contact.events, events.iter().map(|e| (e.key, e.id)));
    let desired = ContactRow {
        id: contact.id,
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        phone_number: contact.phone_number.clone(),
        is_active: true,
    };

    if is_persisted(contact.id) {
        if let Some(stored) = store.get_contact(contact.id)? {
            let fields_changed = stored.first_name != desired.first_name
                || stored.last_name != desired.last_name
                || stored.phone_number != desired.phone_number;
            if fields_changed {
                store.update_contact(&desired)?;
            }
            let links_changed = store.contact_event_ids(contact.id)? != event_ids;
            if links_changed {
                store.replace_contact_links(contact.id, &event_ids)?;
            }
            if !fields_changed && !links_changed {
                return Ok(ReconcileOutcome::Unchanged);
            }
            debug!(
                "event=reconcile module=service status=ok entity=contact outcome=updated id={} fields_changed={} links_changed={}",
                contact.id, fields_changed, links_changed
            );
            return Ok(ReconcileOutcome::Updated);
        }
        warn!(
            "event=reconcile module=service status=reinsert entity=contact stale_id={}",
            contact.id
        );
    }

    let id = store.create_contact(&desired)?;
    contact.id = id;
    for event_id in &event_ids {
        store.insert_link(*event_id, id)?;
    }
    debug!(
        "event=reconcile module=service status=ok entity=contact outcome=inserted key={} id={} links={}",
        contact.key,
        id,
        event_ids.len()
    );
    Ok(ReconcileOutcome::Inserted(id))
}

/// Reconciles every record: categories, then events, then contacts, so
/// foreign references resolve before dependents are written.
///
/// # Errors
/// - Returns the first store failure. Records reconciled before the failure
///   keep their ids and stored state.
pub fn reconcile_all<S>(
    store: &mut S,
    categories: &mut [Category],
    events: &mut [Event],
    contacts: &mut [Contact],
) -> RepoResult<ReconcileReport>
where
    S: CalendarStore + ?Sized,
{
    let started_at = Instant::now();
    let mut report = ReconcileReport::default();

    let result = reconcile_in_order(store, categories, events, contacts, &mut report);

    match result {
        Ok(()) => {
            info!(
                "event=reconcile_all module=service status=ok duration_ms={} inserted={} updated={} unchanged={}",
                started_at.elapsed().as_millis(),
                report.inserted,
                report.updated,
                report.unchanged
            );
            Ok(report)
        }
        Err(err) => {
            error!(
                "event=reconcile_all module=service status=error duration_ms={} inserted={} updated={} error={}",
                started_at.elapsed().as_millis(),
                report.inserted,
                report.updated,
                err
            );
            Err(err)
        }
    }
}

fn reconcile_in_order<S>(
    store: &mut S,
    categories: &mut [Category],
    events: &mut [Event],
    contacts: &mut [Contact],
    report: &mut ReconcileReport,
) -> RepoResult<()>
where
    S: CalendarStore + ?Sized,
{
    for category in categories.iter_mut() {
        report.record(reconcile_category(store, category)?);
    }
    for event in events.iter_mut() {
        report.record(reconcile_event(store, event, categories, contacts)?);
    }
    for contact in contacts.iter_mut() {
        report.record(reconcile_contact(store, contact, events)?);
    }
    Ok(())
}

fn persisted_ids(
    keys: &[RecordKey],
    records: impl Iterator<Item = (RecordKey, StoreId)>,
) -> BTreeSet<StoreId> {
    let known: Vec<(RecordKey, StoreId)> = records.collect();
    keys.iter()
        .filter_map(|key| {
            known
                .iter()
                .find(|(record_key, _)| record_key == key)
                .map(|(_, id)| *id)
        })
        .filter(|id| is_persisted(*id))
        .collect()
}
