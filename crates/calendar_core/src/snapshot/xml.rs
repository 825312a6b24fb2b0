//! XML encoding of calendar snapshots.
//!
//! # Responsibility
//! - Read snapshot files with `roxmltree`.
//! - Write snapshot files with attribute escaping.
//!
//! # Invariants
//! - Links are written once, on the event side (`<attendee key=".."/>`), and
//!   both sides are rebuilt on load.
//! - A missing or empty file loads as `None`, not as an error.
//! - Format version `1` is the only accepted version.

use super::{CalendarSnapshot, SnapshotError, SnapshotResult};
use crate::model::association::relink_from_events;
use crate::model::category::Category;
use crate::model::contact::Contact;
use crate::model::event::{Event, NotifyOffset};
use crate::model::validation::is_forbidden_char;
use crate::model::{RecordKey, StoreId};
use chrono::NaiveDateTime;
use log::{error, info};
use roxmltree::{Document, Node};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

const FORMAT_VERSION: &str = "1";
const XML_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Snapshot file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSnapshotStore {
    path: PathBuf,
}

impl XmlSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot, or `None` when the file is missing or empty.
    pub fn load(&self) -> SnapshotResult<Option<CalendarSnapshot>> {
        load_snapshot(&self.path)
    }

    /// Overwrites the file with `snapshot`, creating parent directories.
    pub fn save(&self, snapshot: &CalendarSnapshot) -> SnapshotResult<()> {
        let started_at = Instant::now();
        let result = write_snapshot(&self.path, snapshot);
        match &result {
            Ok(()) => info!(
                "event=snapshot_save module=snapshot status=ok duration_ms={} categories={} events={} contacts={}",
                started_at.elapsed().as_millis(),
                snapshot.categories.len(),
                snapshot.events.len(),
                snapshot.contacts.len()
            ),
            Err(err) => error!(
                "event=snapshot_save module=snapshot status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

/// Loads a snapshot from an arbitrary file, without binding a store to it.
pub fn load_snapshot(path: &Path) -> SnapshotResult<Option<CalendarSnapshot>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("event=snapshot_load module=snapshot status=ok outcome=missing");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    if text.trim().is_empty() {
        info!("event=snapshot_load module=snapshot status=ok outcome=empty");
        return Ok(None);
    }

    let snapshot = decode_snapshot(&text)?;
    info!(
        "event=snapshot_load module=snapshot status=ok categories={} events={} contacts={}",
        snapshot.categories.len(),
        snapshot.events.len(),
        snapshot.contacts.len()
    );
    Ok(Some(snapshot))
}

fn write_snapshot(path: &Path, snapshot: &CalendarSnapshot) -> SnapshotResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, encode_snapshot(snapshot))?;
    Ok(())
}

/// Renders `snapshot` as an XML document.
pub fn encode_snapshot(snapshot: &CalendarSnapshot) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<calendar format-version=\"{FORMAT_VERSION}\">");

    out.push_str("  <categories>\n");
    for category in &snapshot.categories {
        let _ = writeln!(
            out,
            "    <category key=\"{}\" id=\"{}\" name=\"{}\" color=\"{}\"/>",
            category.key,
            category.id,
            escape_attr(&category.name),
            escape_attr(&category.color_hex)
        );
    }
    out.push_str("  </categories>\n");

    out.push_str("  <events>\n");
    for event in &snapshot.events {
        let _ = write!(
            out,
            "    <event key=\"{}\" id=\"{}\" name=\"{}\" date=\"{}\" notify-offset=\"{}\" location=\"{}\" description=\"{}\"",
            event.key,
            event.id,
            escape_attr(&event.name),
            event.date_time.format(XML_DATE_TIME_FORMAT),
            event.notify_offset,
            escape_attr(&event.location),
            escape_attr(&event.description)
        );
        if let Some(category) = event.category {
            let _ = write!(out, " category=\"{category}\"");
        }
        if event.contacts.is_empty() {
            out.push_str("/>\n");
            continue;
        }
        out.push_str(">\n");
        for contact in &event.contacts {
            let _ = writeln!(out, "      <attendee key=\"{contact}\"/>");
        }
        out.push_str("    </event>\n");
    }
    out.push_str("  </events>\n");

    out.push_str("  <contacts>\n");
    for contact in &snapshot.contacts {
        let _ = writeln!(
            out,
            "    <contact key=\"{}\" id=\"{}\" first-name=\"{}\" last-name=\"{}\" phone=\"{}\"/>",
            contact.key,
            contact.id,
            escape_attr(&contact.first_name),
            escape_attr(&contact.last_name),
            escape_attr(&contact.phone_number)
        );
    }
    out.push_str("  </contacts>\n");
    out.push_str("</calendar>\n");
    out
}

/// Parses an XML document produced by `encode_snapshot`.
pub fn decode_snapshot(text: &str) -> SnapshotResult<CalendarSnapshot> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "calendar" {
        return Err(SnapshotError::InvalidData(format!(
            "unexpected root element `{}`",
            root.tag_name().name()
        )));
    }
    let version = root.attribute("format-version").unwrap_or_default();
    if version != FORMAT_VERSION {
        return Err(SnapshotError::InvalidData(format!(
            "unsupported format-version `{version}`"
        )));
    }

    let mut snapshot = CalendarSnapshot::default();
    for node in section(root, "categories", "category") {
        snapshot.categories.push(Category {
            key: key_attr(node, "key")?,
            id: id_attr(node)?,
            name: required_attr(node, "name")?.to_string(),
            color_hex: node.attribute("color").unwrap_or_default().to_string(),
        });
    }
    for node in section(root, "events", "event") {
        let category = match node.attribute("category") {
            Some(_) => Some(key_attr(node, "category")?),
            None => None,
        };
        let mut contacts = Vec::new();
        for attendee in node
            .children()
            .filter(|child| child.has_tag_name("attendee"))
        {
            contacts.push(key_attr(attendee, "key")?);
        }
        snapshot.events.push(Event {
            key: key_attr(node, "key")?,
            id: id_attr(node)?,
            name: required_attr(node, "name")?.to_string(),
            date_time: date_time_attr(node)?,
            notify_offset: offset_attr(node)?,
            location: node.attribute("location").unwrap_or_default().to_string(),
            description: node.attribute("description").unwrap_or_default().to_string(),
            category,
            contacts,
        });
    }
    for node in section(root, "contacts", "contact") {
        snapshot.contacts.push(Contact {
            key: key_attr(node, "key")?,
            id: id_attr(node)?,
            first_name: required_attr(node, "first-name")?.to_string(),
            last_name: required_attr(node, "last-name")?.to_string(),
            phone_number: required_attr(node, "phone")?.to_string(),
            events: Vec::new(),
        });
    }

    relink_from_events(&mut snapshot.events, &mut snapshot.contacts);
    let category_keys: Vec<RecordKey> = snapshot.categories.iter().map(|c| c.key).collect();
    for event in &mut snapshot.events {
        if event.category.is_some_and(|key| !category_keys.contains(&key)) {
            event.category = None;
        }
    }
    Ok(snapshot)
}

fn section<'a, 'input>(
    root: Node<'a, 'input>,
    section_name: &'static str,
    item_name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    root.children()
        .filter(move |child| child.has_tag_name(section_name))
        .flat_map(|section| section.children())
        .filter(move |child| child.has_tag_name(item_name))
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> SnapshotResult<&'a str> {
    node.attribute(name).ok_or_else(|| {
        SnapshotError::InvalidData(format!(
            "<{}> is missing attribute `{name}`",
            node.tag_name().name()
        ))
    })
}

fn key_attr(node: Node<'_, '_>, name: &str) -> SnapshotResult<RecordKey> {
    let value = required_attr(node, name)?;
    Uuid::parse_str(value)
        .map_err(|_| SnapshotError::InvalidData(format!("invalid key `{value}` in `{name}`")))
}

fn id_attr(node: Node<'_, '_>) -> SnapshotResult<StoreId> {
    let value = required_attr(node, "id")?;
    value
        .parse::<StoreId>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| SnapshotError::InvalidData(format!("invalid id `{value}`")))
}

fn date_time_attr(node: Node<'_, '_>) -> SnapshotResult<NaiveDateTime> {
    let value = required_attr(node, "date")?;
    NaiveDateTime::parse_from_str(value, XML_DATE_TIME_FORMAT)
        .map_err(|_| SnapshotError::InvalidData(format!("invalid date `{value}`")))
}

fn offset_attr(node: Node<'_, '_>) -> SnapshotResult<NotifyOffset> {
    match node.attribute("notify-offset") {
        Some(value) => NotifyOffset::parse(value).map_err(|_| {
            SnapshotError::InvalidData(format!("invalid notify-offset `{value}`"))
        }),
        None => Ok(NotifyOffset::ZERO),
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            // Not representable in XML 1.0.
            other if is_forbidden_char(other) => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_attr_handles_markup_and_newlines() {
        assert_eq!(
            escape_attr("a<b & \"c\"\nd"),
            "a&lt;b &amp; &quot;c&quot;&#10;d"
        );
    }

    #[test]
    fn escape_attr_drops_characters_xml_cannot_hold() {
        assert_eq!(escape_attr("Work\u{1}\u{FFFF}\tday"), "Work&#9;day");
    }

    #[test]
    fn decode_rejects_unknown_root_and_version() {
        let err = decode_snapshot("<agenda/>").unwrap_err();
        assert!(err.to_string().contains("unexpected root"));

        let err = decode_snapshot("<calendar format-version=\"9\"/>").unwrap_err();
        assert!(err.to_string().contains("unsupported format-version"));
    }

    #[test]
    fn decode_accepts_empty_sections() {
        let snapshot = decode_snapshot(
            "<calendar format-version=\"1\"><categories/><events/><contacts/></calendar>",
        )
        .unwrap();
        assert!(snapshot.is_empty());
    }
}
