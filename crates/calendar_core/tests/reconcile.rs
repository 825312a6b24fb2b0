use calendar_core::model::association::add_contact;
use calendar_core::repo::{CategoryRepository, ContactRepository, EventRepository, LinkRepository};
use calendar_core::service::reconcile::{
    reconcile_all, reconcile_category, reconcile_contact, reconcile_event,
};
use calendar_core::{
    Category, CategoryDraft, Contact, ContactDraft, Event, EventDraft, ReconcileOutcome,
    ReconcileReport, SqliteStore, UNASSIGNED_ID,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

fn work() -> Category {
    Category::from_draft(CategoryDraft::new("Work", "#336699"))
}

fn standup(category: Option<&Category>) -> Event {
    let date_time = NaiveDate::from_ymd_opt(2025, 1, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let mut draft = EventDraft::new("Standup", date_time);
    draft.category = category.map(|category| category.key);
    Event::from_draft(&draft)
}

fn jane() -> Contact {
    Contact::from_draft(&ContactDraft::new("Jane", "Doe", "123 456 789"))
}

#[test]
fn new_record_is_inserted_once_then_takes_update_path() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut category = work();
    assert_eq!(category.id, UNASSIGNED_ID);

    let outcome = reconcile_category(&mut store, &mut category).unwrap();
    let ReconcileOutcome::Inserted(id) = outcome else {
        panic!("expected insert, got {outcome:?}");
    };
    assert_eq!(category.id, id);

    assert_eq!(
        reconcile_category(&mut store, &mut category).unwrap(),
        ReconcileOutcome::Unchanged
    );

    category.name = "Office".to_string();
    assert_eq!(
        reconcile_category(&mut store, &mut category).unwrap(),
        ReconcileOutcome::Updated
    );
    assert_eq!(category.id, id);
    assert_eq!(store.list_active_categories().unwrap().len(), 1);
    assert_eq!(store.get_category(id).unwrap().unwrap().name, "Office");
}

#[test]
fn stale_id_is_reinserted() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut contact = jane();
    contact.id = 404;

    let outcome = reconcile_contact(&mut store, &mut contact, &[]).unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Inserted(_)));
    assert_ne!(contact.id, 404);
    assert!(store.get_contact(contact.id).unwrap().is_some());
}

#[test]
fn event_resolves_category_and_writes_links_for_persisted_contacts() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut category = work();
    reconcile_category(&mut store, &mut category).unwrap();
    let mut contacts = vec![jane()];
    reconcile_contact(&mut store, &mut contacts[0], &[]).unwrap();

    let mut event = standup(Some(&category));
    add_contact(&mut event, &mut contacts[0]);
    reconcile_event(
        &mut store,
        &mut event,
        std::slice::from_ref(&category),
        &contacts,
    )
    .unwrap();

    let stored = store.get_event(event.id).unwrap().unwrap();
    assert_eq!(stored.category_id, Some(category.id));
    assert_eq!(
        store.event_contact_ids(event.id).unwrap(),
        BTreeSet::from([contacts[0].id])
    );

    // Contact side already matches the stored link set.
    let events = vec![event];
    assert_eq!(
        reconcile_contact(&mut store, &mut contacts[0], &events).unwrap(),
        ReconcileOutcome::Unchanged
    );
}

#[test]
fn link_changes_alone_count_as_update() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut contacts = vec![jane()];
    let mut events = vec![standup(None)];
    reconcile_all(&mut store, &mut [], &mut events, &mut contacts).unwrap();

    add_contact(&mut events[0], &mut contacts[0]);
    let outcome = reconcile_event(&mut store, &mut events[0], &[], &contacts).unwrap();

    assert_eq!(outcome, ReconcileOutcome::Updated);
    assert_eq!(store.list_links().unwrap(), vec![(events[0].id, contacts[0].id)]);
}

#[test]
fn reconcile_all_inserts_everything_then_is_a_no_op() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut categories = vec![work()];
    let mut events = vec![standup(Some(&categories[0]))];
    let mut contacts = vec![jane()];
    add_contact(&mut events[0], &mut contacts[0]);

    let first = reconcile_all(&mut store, &mut categories, &mut events, &mut contacts).unwrap();
    assert_eq!(
        first,
        ReconcileReport {
            inserted: 3,
            updated: 0,
            unchanged: 0
        }
    );
    assert_eq!(store.list_links().unwrap(), vec![(events[0].id, contacts[0].id)]);
    assert_eq!(
        store.get_event(events[0].id).unwrap().unwrap().category_id,
        Some(categories[0].id)
    );

    let second = reconcile_all(&mut store, &mut categories, &mut events, &mut contacts).unwrap();
    assert_eq!(
        second,
        ReconcileReport {
            inserted: 0,
            updated: 0,
            unchanged: 3
        }
    );
}

#[test]
fn failure_keeps_ids_of_records_reconciled_before_it() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .connection()
        .execute_batch("DROP TABLE events_contacts; DROP TABLE events;")
        .unwrap();
    let mut categories = vec![work()];
    let mut events = vec![standup(None)];

    let result = reconcile_all(&mut store, &mut categories, &mut events, &mut []);

    assert!(result.is_err());
    assert!(categories[0].id > 0);
    assert_eq!(events[0].id, UNASSIGNED_ID);
}
