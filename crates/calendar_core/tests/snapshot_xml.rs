use calendar_core::model::association::{add_contact, is_symmetric};
use calendar_core::snapshot::xml::{decode_snapshot, encode_snapshot};
use calendar_core::{
    CalendarSnapshot, Category, CategoryDraft, Contact, ContactDraft, Event, EventDraft,
    NotifyOffset, SnapshotError, XmlSnapshotStore,
};
use chrono::NaiveDate;

fn sample() -> CalendarSnapshot {
    let mut work = Category::from_draft(CategoryDraft::new("R&D <core>", "#336699"));
    work.id = 3;

    let mut draft = EventDraft::new(
        "Standup \"daily\"",
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    );
    draft.notify_offset = NotifyOffset::new(1, 5).unwrap();
    draft.location = "Room 'A'".to_string();
    draft.description = "line one\nline two".to_string();
    draft.category = Some(work.key);
    let mut standup = Event::from_draft(&draft);

    let mut jane = Contact::from_draft(&ContactDraft::new("Jane", "O'Doe", "123 456 789"));
    jane.id = 8;
    add_contact(&mut standup, &mut jane);

    CalendarSnapshot {
        categories: vec![work],
        events: vec![standup],
        contacts: vec![jane],
    }
}

#[test]
fn save_then_load_preserves_records_and_links() {
    let dir = tempfile::tempdir().unwrap();
    let store = XmlSnapshotStore::new(dir.path().join("nested").join("data.xml"));
    let snapshot = sample();

    store.save(&snapshot).unwrap();
    let loaded = store.load().unwrap().unwrap();

    assert_eq!(loaded, snapshot);
    assert!(is_symmetric(&loaded.events, &loaded.contacts));
    assert_eq!(loaded.events[0].description, "line one\nline two");
    assert_eq!(loaded.categories[0].name, "R&D <core>");
}

#[test]
fn missing_or_blank_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.xml");
    let store = XmlSnapshotStore::new(&path);
    assert!(store.load().unwrap().is_none());

    std::fs::write(&path, "  \n").unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = XmlSnapshotStore::new(dir.path().join("data.xml"));
    store.save(&sample()).unwrap();

    store.save(&CalendarSnapshot::default()).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn malformed_documents_are_errors() {
    assert!(matches!(
        decode_snapshot("<calendar format-version=\"1\">"),
        Err(SnapshotError::Parse(_))
    ));

    let missing_name = "<calendar format-version=\"1\"><categories>\
        <category key=\"6f1c1f0e-8d2a-4a53-9a0e-3c1f6c1d2b11\" id=\"0\"/>\
        </categories></calendar>";
    assert!(matches!(
        decode_snapshot(missing_name),
        Err(SnapshotError::InvalidData(_))
    ));
}

#[test]
fn unknown_category_reference_is_dropped_on_load() {
    let mut snapshot = sample();
    snapshot.categories.clear();

    let loaded = decode_snapshot(&encode_snapshot(&snapshot)).unwrap();

    assert_eq!(loaded.events[0].category, None);
}
