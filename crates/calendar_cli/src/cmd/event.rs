//! `calendar event ...`

use super::{
    parse_date_arg, parse_date_time_arg, resolve_category, resolve_contact, resolve_event,
    save_after,
};
use crate::output::{self, render, OutputMode};
use crate::Calendar;
use anyhow::anyhow;
use calendar_core::{Event, EventDraft, EventSortKey, NotifyOffset, RecordKey};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct EventArgs {
    #[command(subcommand)]
    pub command: EventCommand,
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// List events.
    List {
        /// Only events on this day, e.g. `2025-01-10`.
        #[arg(long)]
        on: Option<String>,
        /// name | date | location | description | category
        #[arg(long, default_value = "date")]
        sort: EventSortKey,
    },
    /// Show one event with its contacts.
    Show {
        /// Event id or key.
        event: String,
    },
    /// Add an event.
    Add {
        name: String,
        /// Start, e.g. `2025-01-10 09:00`.
        #[arg(long)]
        at: String,
        #[command(flatten)]
        fields: EventFields,
    },
    /// Change an event. Omitted fields keep their value.
    Update {
        /// Event id or key.
        event: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        at: Option<String>,
        #[command(flatten)]
        fields: EventFields,
        /// Remove the event's category.
        #[arg(long, conflicts_with = "category")]
        no_category: bool,
        /// Remove every contact before applying `--contact`.
        #[arg(long)]
        clear_contacts: bool,
    },
    /// Delete an event.
    Delete {
        /// Event id or key.
        event: String,
    },
    /// Permanently delete every event before a day.
    Purge {
        #[arg(long)]
        before: String,
    },
}

#[derive(Args, Debug)]
pub struct EventFields {
    /// Reminder offset before the start, as `H:MM`.
    #[arg(long)]
    notify: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Category id, key or name.
    #[arg(long)]
    category: Option<String>,
    /// Contact id or key. Repeatable.
    #[arg(long = "contact")]
    contacts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EventView<'a> {
    #[serde(flatten)]
    event: &'a Event,
    category_name: Option<&'a str>,
    reminder_at: String,
}

pub fn run(calendar: &mut Calendar, args: EventArgs, output: OutputMode) -> anyhow::Result<()> {
    match args.command {
        EventCommand::List { on, sort } => {
            calendar.sort_events(sort);
            let calendar: &Calendar = calendar;
            let events: Vec<&Event> = match on {
                Some(day) => calendar.events_on(parse_date_arg(&day)?),
                None => calendar.events().iter().collect(),
            };
            let views: Vec<EventView<'_>> = events
                .into_iter()
                .map(|event| view(calendar, event))
                .collect();
            render(output, &views, |views, w| {
                output::section(w, "Events")?;
                for view in views {
                    output::event_line(w, view.event, view.category_name)?;
                }
                Ok(())
            })
        }
        EventCommand::Show { event } => {
            let key = resolve_event(calendar, &event)?;
            print_event(calendar, key, output, None)
        }
        EventCommand::Add { name, at, fields } => {
            let mut draft = EventDraft::new(name, parse_date_time_arg(&at)?);
            apply_fields(calendar, &mut draft, fields)?;
            let result = calendar.add_event(draft);
            let key = save_after(calendar, result)?;
            print_event(calendar, key, output, Some("Added"))
        }
        EventCommand::Update {
            event,
            name,
            at,
            fields,
            no_category,
            clear_contacts,
        } => {
            let key = resolve_event(calendar, &event)?;
            let current = calendar
                .event(key)
                .ok_or_else(|| anyhow!("event not found: {event}"))?;
            let mut draft = EventDraft {
                name: current.name.clone(),
                date_time: current.date_time,
                notify_offset: current.notify_offset,
                location: current.location.clone(),
                description: current.description.clone(),
                category: current.category,
                contacts: if clear_contacts {
                    Vec::new()
                } else {
                    current.contacts.clone()
                },
            };
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(at) = at {
                draft.date_time = parse_date_time_arg(&at)?;
            }
            if no_category {
                draft.category = None;
            }
            apply_fields(calendar, &mut draft, fields)?;

            let result = calendar.update_event(key, draft);
            save_after(calendar, result)?;
            print_event(calendar, key, output, Some("Updated"))
        }
        EventCommand::Delete { event } => {
            let key = resolve_event(calendar, &event)?;
            let result = calendar.delete_event(key);
            save_after(calendar, result)?;
            render(output, &serde_json::json!({ "ok": true, "deleted": key }), |_, w| {
                writeln!(w, "Deleted event {key}")
            })
        }
        EventCommand::Purge { before } => {
            let date = parse_date_arg(&before)?;
            let result = calendar.purge_events_before(date);
            let removed = save_after(calendar, result)?;
            render(output, &serde_json::json!({ "ok": true, "removed": removed }), |_, w| {
                writeln!(w, "Removed {removed} event(s) before {}", date.format("%d.%m.%Y"))
            })
        }
    }
}

fn apply_fields(
    calendar: &Calendar,
    draft: &mut EventDraft,
    fields: EventFields,
) -> anyhow::Result<()> {
    if let Some(notify) = fields.notify {
        draft.notify_offset = NotifyOffset::parse(&notify)?;
    }
    if let Some(location) = fields.location {
        draft.location = location;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(category) = fields.category {
        draft.category = Some(resolve_category(calendar, &category)?);
    }
    for contact in fields.contacts {
        let key = resolve_contact(calendar, &contact)?;
        if !draft.contacts.contains(&key) {
            draft.contacts.push(key);
        }
    }
    Ok(())
}

fn view<'a>(calendar: &'a Calendar, event: &'a Event) -> EventView<'a> {
    EventView {
        event,
        category_name: calendar.category_name_of(event),
        reminder_at: event.formatted_reminder(),
    }
}

fn print_event(
    calendar: &Calendar,
    key: RecordKey,
    output: OutputMode,
    verb: Option<&str>,
) -> anyhow::Result<()> {
    let event = calendar
        .event(key)
        .ok_or_else(|| anyhow!("event not found: {key}"))?;
    let value = view(calendar, event);
    render(output, &value, |view, w| {
        if let Some(verb) = verb {
            writeln!(w, "{verb} event.")?;
        }
        output::section(w, &view.event.name)?;
        output::kv(w, "Id", view.event.id.to_string())?;
        output::kv(w, "Key", view.event.key.to_string())?;
        output::kv(w, "Date", view.event.formatted_date())?;
        output::kv(w, "Reminder", &view.reminder_at)?;
        output::kv(
            w,
            "Location",
            output::or_placeholder(&view.event.location, "No location"),
        )?;
        output::kv(
            w,
            "Description",
            output::or_placeholder(&view.event.description, "No description"),
        )?;
        output::kv(w, "Category", view.category_name.unwrap_or("No category"))?;
        output::kv(w, "Contacts", view.event.contacts.len().to_string())?;
        for contact in view
            .event
            .contacts
            .iter()
            .filter_map(|key| calendar.contact(*key))
        {
            writeln!(w, "  - {contact}")?;
        }
        Ok(())
    })
}
