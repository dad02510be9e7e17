//! Calendar event snapshots.
//!
//! Events are owned by the caller's event store. The core only ever borrows
//! them for the duration of one call.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Identifier of a calendar event.
pub type EventId = String;

/// Identifier of an attendee (e.g. an email address).
pub type AttendeeId = String;

/// Category of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Personal,
    #[default]
    Work,
    Effort,
    Note,
}

/// Read-only snapshot of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    pub interval: Interval,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub attendees: BTreeSet<AttendeeId>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub all_day: bool,
}

impl CalendarEvent {
    /// Create a timed work event with no attendees or location.
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, interval: Interval) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            interval,
            category: EventCategory::default(),
            attendees: BTreeSet::new(),
            location: None,
            all_day: false,
        }
    }

    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AttendeeId>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn as_all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Location, ignoring blank strings.
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Whether this event counts towards a day's meeting load.
    pub fn is_meeting(&self) -> bool {
        !self.all_day && self.category != EventCategory::Note
    }

    /// Whether two events share at least one attendee.
    pub fn shares_attendee_with(&self, other: &CalendarEvent) -> bool {
        !self.attendees.is_disjoint(&other.attendees)
    }

    /// Whether two events take place at the same (non-blank) location.
    /// Comparison ignores ASCII case.
    pub fn shares_location_with(&self, other: &CalendarEvent) -> bool {
        match (self.location(), other.location()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}
