//! Human and JSON rendering for CLI results.

use calendar_core::{Category, Contact, Event};
use serde::Serialize;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Writes `value` as pretty JSON, or through `human` otherwise.
pub fn render<T, F>(mode: OutputMode, value: &T, human: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T, &mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
    } else {
        human(value, &mut out)?;
    }
    Ok(())
}

pub fn section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

pub fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

pub fn category_line(w: &mut dyn Write, category: &Category) -> io::Result<()> {
    writeln!(
        w,
        "{:>4}  {:<24} {}",
        category.id,
        category.name,
        or_placeholder(&category.color_hex, "-")
    )
}

pub fn event_line(w: &mut dyn Write, event: &Event, category_name: Option<&str>) -> io::Result<()> {
    writeln!(
        w,
        "{:>4}  {}  {:<24} {:<20} {}",
        event.id,
        event.formatted_date(),
        event.name,
        or_placeholder(&event.location, "No location"),
        category_name.unwrap_or("No category")
    )
}

pub fn contact_line(w: &mut dyn Write, contact: &Contact) -> io::Result<()> {
    writeln!(w, "{:>4}  {contact}", contact.id)
}
