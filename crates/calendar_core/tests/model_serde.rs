use calendar_core::{Contact, ContactDraft, Event, EventDraft, NotifyOffset};
use chrono::NaiveDate;
use serde_json::json;

#[test]
fn notify_offset_serializes_as_clock_text() {
    let offset = NotifyOffset::new(1, 30).unwrap();

    assert_eq!(serde_json::to_value(offset).unwrap(), json!("01:30"));
    let parsed: NotifyOffset = serde_json::from_value(json!("0:05")).unwrap();
    assert_eq!(parsed, NotifyOffset::new(0, 5).unwrap());
    assert!(serde_json::from_value::<NotifyOffset>(json!("24:00")).is_err());
}

#[test]
fn event_wire_shape_uses_keys_for_links() {
    let mut draft = EventDraft::new(
        "Standup",
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    );
    draft.notify_offset = NotifyOffset::new(0, 15).unwrap();
    let event = Event::from_draft(&draft);

    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["name"], json!("Standup"));
    assert_eq!(value["id"], json!(0));
    assert_eq!(value["date_time"], json!("2025-01-10T09:00:00"));
    assert_eq!(value["notify_offset"], json!("00:15"));
    assert_eq!(value["category"], json!(null));
    assert_eq!(value["contacts"], json!([]));
    assert_eq!(value["key"], json!(event.key.to_string()));
}

#[test]
fn contact_round_trips_through_json() {
    let contact = Contact::from_draft(
        &ContactDraft::new("Jane", "Doe", "123456789")
            .normalized()
            .unwrap(),
    );

    let text = serde_json::to_string(&contact).unwrap();
    let back: Contact = serde_json::from_str(&text).unwrap();

    assert_eq!(back, contact);
    assert_eq!(back.phone_number, "123 456 789");
    assert_eq!(back.to_string(), "Jane Doe | 123 456 789");
}
