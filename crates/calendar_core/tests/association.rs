use calendar_core::model::association::{
    add_contact, add_event, detach_contact, detach_event, is_symmetric, relink_from_events,
    remove_contact, replace_contacts, replace_events, AssociationError,
};
use calendar_core::{Contact, ContactDraft, Event, EventDraft};
use chrono::NaiveDate;

fn event(name: &str, hour: u32) -> Event {
    let date_time = NaiveDate::from_ymd_opt(2025, 1, 10)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap();
    Event::from_draft(&EventDraft::new(name, date_time))
}

fn contact(first_name: &str, phone_number: &str) -> Contact {
    Contact::from_draft(&ContactDraft::new(first_name, "Doe", phone_number))
}

#[test]
fn add_links_both_sides_and_is_idempotent() {
    let mut standup = event("Standup", 9);
    let mut jane = contact("Jane", "123 456 789");

    add_contact(&mut standup, &mut jane);
    add_contact(&mut standup, &mut jane);
    add_event(&mut jane, &mut standup);

    assert_eq!(standup.contacts, vec![jane.key]);
    assert_eq!(jane.events, vec![standup.key]);
}

#[test]
fn remove_unlinks_both_sides() {
    let mut standup = event("Standup", 9);
    let mut jane = contact("Jane", "123 456 789");
    add_contact(&mut standup, &mut jane);

    remove_contact(&mut standup, &mut jane);
    remove_contact(&mut standup, &mut jane);

    assert!(!standup.has_contact(jane.key));
    assert!(!jane.has_event(standup.key));
}

#[test]
fn replace_contacts_fixes_dropped_and_added_partners() {
    let mut standup = event("Standup", 9);
    let mut contacts = vec![
        contact("Jane", "123 456 789"),
        contact("John", "987 654 321"),
        contact("Ann", "555 555 555"),
    ];
    let (jane, john, ann) = (contacts[0].key, contacts[1].key, contacts[2].key);
    replace_contacts(&mut standup, &mut contacts, &[jane, john]).unwrap();

    replace_contacts(&mut standup, &mut contacts, &[john, ann]).unwrap();

    let linked: std::collections::BTreeSet<_> = standup.contacts.iter().copied().collect();
    assert_eq!(linked, [john, ann].into_iter().collect());
    assert!(contacts[0].events.is_empty());
    assert_eq!(contacts[1].events, vec![standup.key]);
    assert_eq!(contacts[2].events, vec![standup.key]);
    assert!(is_symmetric(std::slice::from_ref(&standup), &contacts));
}

#[test]
fn replace_with_unknown_key_changes_nothing() {
    let mut jane = contact("Jane", "123 456 789");
    let mut events = vec![event("Standup", 9), event("Review", 15)];
    let standup = events[0].key;
    replace_events(&mut jane, &mut events, &[standup]).unwrap();

    let stranger = event("Elsewhere", 11).key;
    let err = replace_events(&mut jane, &mut events, &[stranger]).unwrap_err();

    assert_eq!(err, AssociationError::UnknownEvent(stranger));
    assert_eq!(jane.events, vec![standup]);
    assert_eq!(events[0].contacts, vec![jane.key]);
}

#[test]
fn detach_clears_every_link_of_the_record() {
    let mut events = vec![event("Standup", 9), event("Review", 15)];
    let mut contacts = vec![contact("Jane", "123 456 789"), contact("John", "987 654 321")];
    for event in events.iter_mut() {
        for contact in contacts.iter_mut() {
            add_contact(event, contact);
        }
    }

    let mut review = events.remove(1);
    detach_event(&mut review, &mut contacts);
    assert!(review.contacts.is_empty());
    assert!(contacts.iter().all(|c| c.events == vec![events[0].key]));

    let mut jane = contacts.remove(0);
    detach_contact(&mut jane, &mut events);
    assert!(jane.events.is_empty());
    assert_eq!(events[0].contacts, vec![contacts[0].key]);
    assert!(is_symmetric(&events, &contacts));
}

#[test]
fn relink_rebuilds_contact_side_and_drops_dangling_keys() {
    let mut events = vec![event("Standup", 9)];
    let mut contacts = vec![contact("Jane", "123 456 789")];
    let dangling = contact("Ghost", "000 000 000").key;
    events[0].contacts = vec![contacts[0].key, dangling];

    relink_from_events(&mut events, &mut contacts);

    assert_eq!(events[0].contacts, vec![contacts[0].key]);
    assert_eq!(contacts[0].events, vec![events[0].key]);
    assert!(is_symmetric(&events, &contacts));
}
