//! Subcommand handlers.

pub mod category;
pub mod contact;
pub mod event;

use crate::output::{self, render, OutputMode};
use crate::Calendar;
use anyhow::{anyhow, bail, Context};
use calendar_core::model::validation::{parse_date, parse_date_time};
use calendar_core::{load_snapshot, due_reminders, Event, RecordKey, ReminderClock, StoreId};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Event id or key.
    pub event: String,
    /// Contact id or key.
    pub contact: String,
}

#[derive(Args, Debug)]
pub struct RemindersArgs {
    /// Minute to check, e.g. `2025-01-10 08:45`.
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Snapshot file to read.
    pub path: PathBuf,
}

/// Store id or in-memory key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Id(StoreId),
    Key(RecordKey),
}

impl std::str::FromStr for RecordRef {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(id) = value.parse::<StoreId>() {
            if id > 0 {
                return Ok(Self::Id(id));
            }
        }
        Uuid::parse_str(value)
            .map(Self::Key)
            .map_err(|_| anyhow!("`{value}` is neither a store id nor a record key"))
    }
}

pub fn resolve_event(calendar: &Calendar, reference: &str) -> anyhow::Result<RecordKey> {
    let found = match reference.parse::<RecordRef>()? {
        RecordRef::Id(id) => calendar.event_by_id(id),
        RecordRef::Key(key) => calendar.event(key),
    };
    found
        .map(|event| event.key)
        .ok_or_else(|| anyhow!("event not found: {reference}"))
}

pub fn resolve_contact(calendar: &Calendar, reference: &str) -> anyhow::Result<RecordKey> {
    let found = match reference.parse::<RecordRef>()? {
        RecordRef::Id(id) => calendar.contact_by_id(id),
        RecordRef::Key(key) => calendar.contact(key),
    };
    found
        .map(|contact| contact.key)
        .ok_or_else(|| anyhow!("contact not found: {reference}"))
}

/// Resolves a category by id, key or exact name.
pub fn resolve_category(calendar: &Calendar, reference: &str) -> anyhow::Result<RecordKey> {
    let found = match reference.parse::<RecordRef>() {
        Ok(RecordRef::Id(id)) => calendar.category_by_id(id),
        Ok(RecordRef::Key(key)) => calendar.category(key),
        Err(_) => calendar
            .categories()
            .iter()
            .find(|category| category.name == reference.trim()),
    };
    found
        .map(|category| category.key)
        .ok_or_else(|| anyhow!("category not found: {reference}"))
}

pub fn parse_date_arg(value: &str) -> anyhow::Result<NaiveDate> {
    parse_date(value).with_context(|| format!("parsing date `{value}`"))
}

pub fn parse_date_time_arg(value: &str) -> anyhow::Result<NaiveDateTime> {
    parse_date_time(value).with_context(|| format!("parsing date-time `{value}`"))
}

/// Runs `mutation`, then saves the snapshot even when the store write failed.
pub fn save_after<T>(
    calendar: &Calendar,
    mutation: calendar_core::CalendarResult<T>,
) -> anyhow::Result<T> {
    let saved = calendar.save_snapshot();
    let value = mutation?;
    saved.context("saving snapshot")?;
    Ok(value)
}

#[derive(Debug, Serialize)]
struct LinkOutput {
    ok: bool,
    linked: bool,
    event: RecordKey,
    contact: RecordKey,
}

pub fn run_link(
    calendar: &mut Calendar,
    args: &LinkArgs,
    linked: bool,
    output: OutputMode,
) -> anyhow::Result<()> {
    let event = resolve_event(calendar, &args.event)?;
    let contact = resolve_contact(calendar, &args.contact)?;
    let result = if linked {
        calendar.link(event, contact)
    } else {
        calendar.unlink(event, contact)
    };
    save_after(calendar, result)?;

    let value = LinkOutput {
        ok: true,
        linked,
        event,
        contact,
    };
    render(output, &value, |v, w| {
        let verb = if v.linked { "Linked" } else { "Unlinked" };
        writeln!(w, "{verb} contact {} and event {}", v.contact, v.event)
    })
}

pub fn run_reminders(
    calendar: &Calendar,
    args: &RemindersArgs,
    output: OutputMode,
) -> anyhow::Result<()> {
    let at = match &args.at {
        Some(value) => parse_date_time_arg(value)?,
        None => Local::now().naive_local(),
    };
    let due: Vec<&Event> = due_reminders(calendar.events(), at);
    render(output, &due, |due, w| {
        if due.is_empty() {
            return writeln!(w, "No reminders due.");
        }
        for event in due {
            print_reminder(w, event)?;
        }
        Ok(())
    })
}

pub fn run_watch(calendar: &Calendar) -> anyhow::Result<()> {
    let mut clock = ReminderClock::new();
    let stdout = std::io::stdout();
    loop {
        let due = clock.tick(calendar.events(), Local::now().naive_local());
        if !due.is_empty() {
            let mut out = stdout.lock();
            for event in due {
                print_reminder(&mut out, event)?;
            }
            out.flush()?;
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}

fn print_reminder(w: &mut dyn Write, event: &Event) -> std::io::Result<()> {
    writeln!(
        w,
        "Reminder: {} at {} ({})",
        event.name,
        event.formatted_date(),
        output::or_placeholder(&event.location, "No location")
    )
}

pub fn run_inspect(args: &InspectArgs, output: OutputMode) -> anyhow::Result<()> {
    let Some(snapshot) = load_snapshot(&args.path)
        .with_context(|| format!("reading snapshot `{}`", args.path.display()))?
    else {
        bail!("snapshot `{}` is missing or empty", args.path.display());
    };

    render(output, &snapshot, |snapshot, w| {
        output::section(w, &format!("Categories ({})", snapshot.categories.len()))?;
        for category in &snapshot.categories {
            output::category_line(w, category)?;
        }
        writeln!(w)?;
        output::section(w, &format!("Events ({})", snapshot.events.len()))?;
        for event in &snapshot.events {
            let category = event.category.and_then(|key| {
                snapshot
                    .categories
                    .iter()
                    .find(|category| category.key == key)
                    .map(|category| category.name.as_str())
            });
            output::event_line(w, event, category)?;
        }
        writeln!(w)?;
        output::section(w, &format!("Contacts ({})", snapshot.contacts.len()))?;
        for contact in &snapshot.contacts {
            output::contact_line(w, contact)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ref_prefers_positive_ids() {
        assert_eq!("42".parse::<RecordRef>().unwrap(), RecordRef::Id(42));
        let key = Uuid::new_v4();
        assert_eq!(
            key.to_string().parse::<RecordRef>().unwrap(),
            RecordRef::Key(key)
        );
        assert!("0".parse::<RecordRef>().is_err());
        assert!("standup".parse::<RecordRef>().is_err());
    }
}
