use calendar_core::model::event::NotifyOffset;
use calendar_core::repo::{
    CategoryRepository, CategoryRow, ContactRepository, ContactRow, EventRepository, EventRow,
    LinkRepository,
};
use calendar_core::{RepoError, SqliteStore};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn category_row(name: &str) -> CategoryRow {
    CategoryRow {
        id: 0,
        name: name.to_string(),
        color_hex: "#00FF00".to_string(),
        is_active: true,
    }
}

fn event_row(name: &str, date_time: NaiveDateTime) -> EventRow {
    EventRow {
        id: 0,
        name: name.to_string(),
        date_time,
        notify_offset: NotifyOffset::new(0, 15).unwrap(),
        location: "Room 1".to_string(),
        description: String::new(),
        category_id: None,
        is_active: true,
    }
}

fn contact_row(first_name: &str, phone_number: &str) -> ContactRow {
    ContactRow {
        id: 0,
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        phone_number: phone_number.to_string(),
        is_active: true,
    }
}

#[test]
fn category_create_get_update_and_soft_delete() {
    let store = SqliteStore::open_in_memory().unwrap();

    let id = store.create_category(&category_row("Work")).unwrap();
    assert!(id > 0);

    let mut loaded = store.get_category(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Work");
    assert!(loaded.is_active);

    loaded.name = "Office".to_string();
    store.update_category(&loaded).unwrap();
    assert_eq!(store.get_category(id).unwrap().unwrap().name, "Office");

    store.soft_delete_category(id).unwrap();
    assert!(store.list_active_categories().unwrap().is_empty());
    let inactive = store.get_category(id).unwrap().unwrap();
    assert!(!inactive.is_active);
}

#[test]
fn update_and_delete_of_missing_rows_return_not_found() {
    let store = SqliteStore::open_in_memory().unwrap();

    let mut row = contact_row("Jane", "123 456 789");
    row.id = 77;
    match store.update_contact(&row).unwrap_err() {
        RepoError::NotFound { entity, id } => {
            assert_eq!(entity, "contact");
            assert_eq!(id, 77);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        store.soft_delete_event(5),
        Err(RepoError::NotFound { entity: "event", id: 5 })
    ));
}

#[test]
fn event_row_round_trips_date_offset_and_category() {
    let store = SqliteStore::open_in_memory().unwrap();
    let category_id = store.create_category(&category_row("Work")).unwrap();

    let mut row = event_row("Standup", at(2025, 1, 10, 9, 0));
    row.category_id = Some(category_id);
    let id = store.create_event(&row).unwrap();

    let loaded = store.get_event(id).unwrap().unwrap();
    assert_eq!(loaded.date_time, at(2025, 1, 10, 9, 0));
    assert_eq!(loaded.notify_offset.to_string(), "00:15");
    assert_eq!(loaded.category_id, Some(category_id));
    assert_eq!(loaded.location, "Room 1");
}

#[test]
fn active_events_are_listed_by_date() {
    let store = SqliteStore::open_in_memory().unwrap();
    let late = store
        .create_event(&event_row("Late", at(2025, 3, 1, 18, 0)))
        .unwrap();
    let early = store
        .create_event(&event_row("Early", at(2025, 1, 1, 8, 0)))
        .unwrap();
    let hidden = store
        .create_event(&event_row("Hidden", at(2025, 2, 1, 8, 0)))
        .unwrap();
    store.soft_delete_event(hidden).unwrap();

    let ids: Vec<i64> = store
        .list_active_events()
        .unwrap()
        .into_iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(ids, vec![early, late]);
}

#[test]
fn corrupt_date_column_is_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO events (event_name, event_date) VALUES ('Broken', 'yesterday');",
            [],
        )
        .unwrap();

    let err = store.list_active_events().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn link_rows_are_idempotent_and_replaced_as_a_set() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let event = store
        .create_event(&event_row("Standup", at(2025, 1, 10, 9, 0)))
        .unwrap();
    let jane = store.create_contact(&contact_row("Jane", "123 456 789")).unwrap();
    let john = store.create_contact(&contact_row("John", "987 654 321")).unwrap();

    store.insert_link(event, jane).unwrap();
    store.insert_link(event, jane).unwrap();
    assert_eq!(store.event_contact_ids(event).unwrap(), BTreeSet::from([jane]));

    store
        .replace_event_links(event, &BTreeSet::from([john]))
        .unwrap();
    assert_eq!(store.event_contact_ids(event).unwrap(), BTreeSet::from([john]));
    assert!(store.contact_event_ids(jane).unwrap().is_empty());

    store.replace_contact_links(john, &BTreeSet::new()).unwrap();
    assert!(store.list_links().unwrap().is_empty());
}

#[test]
fn purge_removes_old_events_and_their_links_only() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let old = store
        .create_event(&event_row("Old", at(2024, 12, 31, 23, 59)))
        .unwrap();
    let kept = store
        .create_event(&event_row("Kept", at(2025, 1, 1, 0, 0)))
        .unwrap();
    let jane = store.create_contact(&contact_row("Jane", "123 456 789")).unwrap();
    store.insert_link(old, jane).unwrap();
    store.insert_link(kept, jane).unwrap();

    let purged = store.purge_events_before(at(2025, 1, 1, 0, 0)).unwrap();

    assert_eq!(purged, 1);
    assert!(store.get_event(old).unwrap().is_none());
    assert!(store.get_event(kept).unwrap().is_some());
    assert_eq!(store.list_links().unwrap(), vec![(kept, jane)]);
}
