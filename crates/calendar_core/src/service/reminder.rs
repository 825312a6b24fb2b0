//! Reminder clock.
//!
//! # Invariants
//! - An event is due when `date_time - notify_offset` equals the tick's
//!   minute.
//! - Each event is reported at most once per reminder minute, however often
//!   the clock ticks within that minute.

use crate::model::event::Event;
use crate::model::validation::truncate_to_minute;
use crate::model::RecordKey;
use chrono::NaiveDateTime;
use log::debug;

/// Events whose reminder falls on the minute of `at`.
pub fn due_reminders(events: &[Event], at: NaiveDateTime) -> Vec<&Event> {
    let minute = truncate_to_minute(at);
    events
        .iter()
        .filter(|event| event.reminder_at() == minute)
        .collect()
}

/// Stateful ticker that suppresses repeats within one minute.
#[derive(Debug, Default)]
pub struct ReminderClock {
    current_minute: Option<NaiveDateTime>,
    fired: Vec<RecordKey>,
}

impl ReminderClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns events that became due at `now` and were not reported yet.
    pub fn tick<'a>(&mut self, events: &'a [Event], now: NaiveDateTime) -> Vec<&'a Event> {
        let minute = truncate_to_minute(now);
        if self.current_minute != Some(minute) {
            self.current_minute = Some(minute);
            self.fired.clear();
        }

        let due: Vec<&Event> = due_reminders(events, minute)
            .into_iter()
            .filter(|event| !self.fired.contains(&event.key))
            .collect();
        self.fired.extend(due.iter().map(|event| event.key));
        if !due.is_empty() {
            debug!(
                "event=reminder_tick module=service status=ok due={}",
                due.len()
            );
        }
        due
    }
}
