//! `calendar contact ...`

use super::{resolve_contact, resolve_event, save_after};
use crate::output::{self, render, OutputMode};
use crate::Calendar;
use anyhow::anyhow;
use calendar_core::{Contact, ContactDraft, ContactSortKey, RecordKey};
use clap::{Args, Subcommand};
use std::io::Write;

#[derive(Args, Debug)]
pub struct ContactArgs {
    #[command(subcommand)]
    pub command: ContactCommand,
}

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    /// List contacts.
    List {
        /// first | last | phone
        #[arg(long, default_value = "first")]
        sort: ContactSortKey,
    },
    /// Show one contact with its events.
    Show {
        /// Contact id or key.
        contact: String,
    },
    /// Add a contact.
    Add {
        first_name: String,
        last_name: String,
        /// Nine digits, spacing ignored.
        phone_number: String,
        /// Event id or key. Repeatable.
        #[arg(long = "event")]
        events: Vec<String>,
    },
    /// Change a contact. Omitted fields keep their value.
    Update {
        /// Contact id or key.
        contact: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        /// Event id or key to add. Repeatable.
        #[arg(long = "event")]
        events: Vec<String>,
        /// Remove every event before applying `--event`.
        #[arg(long)]
        clear_events: bool,
    },
    /// Delete a contact.
    Delete {
        /// Contact id or key.
        contact: String,
    },
}

pub fn run(calendar: &mut Calendar, args: ContactArgs, output: OutputMode) -> anyhow::Result<()> {
    match args.command {
        ContactCommand::List { sort } => {
            calendar.sort_contacts(sort);
            render(output, calendar.contacts(), |contacts, w| {
                output::section(w, "Contacts")?;
                for contact in contacts {
                    output::contact_line(w, contact)?;
                }
                Ok(())
            })
        }
        ContactCommand::Show { contact } => {
            let key = resolve_contact(calendar, &contact)?;
            print_contact(calendar, key, output, None)
        }
        ContactCommand::Add {
            first_name,
            last_name,
            phone_number,
            events,
        } => {
            let events = resolve_events(calendar, &events)?;
            let draft = ContactDraft::new(first_name, last_name, phone_number).with_events(events);
            let result = calendar.add_contact(draft);
            let key = save_after(calendar, result)?;
            print_contact(calendar, key, output, Some("Added"))
        }
        ContactCommand::Update {
            contact,
            first_name,
            last_name,
            phone_number,
            events,
            clear_events,
        } => {
            let key = resolve_contact(calendar, &contact)?;
            let current = calendar
                .contact(key)
                .ok_or_else(|| anyhow!("contact not found: {contact}"))?;
            let mut linked = if clear_events {
                Vec::new()
            } else {
                current.events.clone()
            };
            let draft = ContactDraft::new(
                first_name.unwrap_or_else(|| current.first_name.clone()),
                last_name.unwrap_or_else(|| current.last_name.clone()),
                phone_number.unwrap_or_else(|| current.phone_number.clone()),
            );
            for event in resolve_events(calendar, &events)? {
                if !linked.contains(&event) {
                    linked.push(event);
                }
            }

            let result = calendar.update_contact(key, draft.with_events(linked));
            save_after(calendar, result)?;
            print_contact(calendar, key, output, Some("Updated"))
        }
        ContactCommand::Delete { contact } => {
            let key = resolve_contact(calendar, &contact)?;
            let result = calendar.delete_contact(key);
            save_after(calendar, result)?;
            render(output, &serde_json::json!({ "ok": true, "deleted": key }), |_, w| {
                writeln!(w, "Deleted contact {key}")
            })
        }
    }
}

fn resolve_events(calendar: &Calendar, references: &[String]) -> anyhow::Result<Vec<RecordKey>> {
    references
        .iter()
        .map(|reference| resolve_event(calendar, reference))
        .collect()
}

fn print_contact(
    calendar: &Calendar,
    key: RecordKey,
    output: OutputMode,
    verb: Option<&str>,
) -> anyhow::Result<()> {
    let contact: &Contact = calendar
        .contact(key)
        .ok_or_else(|| anyhow!("contact not found: {key}"))?;
    render(output, contact, |contact, w| {
        if let Some(verb) = verb {
            writeln!(w, "{verb} contact.")?;
        }
        output::section(w, &format!("{} {}", contact.first_name, contact.last_name))?;
        output::kv(w, "Id", contact.id.to_string())?;
        output::kv(w, "Key", contact.key.to_string())?;
        output::kv(w, "Phone", &contact.phone_number)?;
        output::kv(w, "Events", contact.events.len().to_string())?;
        for event in contact
            .events
            .iter()
            .filter_map(|key| calendar.event(*key))
        {
            writeln!(w, "  - {}  {}", event.formatted_date(), event.name)?;
        }
        Ok(())
    })
}
