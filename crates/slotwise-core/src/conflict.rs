//! Conflict detection and classification.
//!
//! [`ConflictDetector::detect`] checks one candidate interval against an event
//! set and the caller's preferences. Descriptors come back in a fixed order:
//! time overlaps (in event order), then the lunch overlap, then buffer
//! violations (preceding side first). Views rely on that order for display
//! priority.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::event::{CalendarEvent, EventId};
use crate::interval::Interval;
use crate::preferences::SchedulingPreferences;

/// Kind of scheduling conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    TimeOverlap,
    ResourceConflict,
    BufferViolation,
    LunchOverlap,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeOverlap => "time_overlap",
            Self::ResourceConflict => "resource_conflict",
            Self::BufferViolation => "buffer_violation",
            Self::LunchOverlap => "lunch_overlap",
        }
    }
}

/// Severity of a conflict, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConflictSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A detected conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDescriptor {
    pub kind: ConflictKind,
    pub severity: ConflictSeverity,
    pub involved_event_ids: Vec<EventId>,
    pub description: String,
}

impl ConflictDescriptor {
    fn new(
        kind: ConflictKind,
        severity: ConflictSeverity,
        involved_event_ids: Vec<EventId>,
        description: String,
    ) -> Self {
        Self {
            kind,
            severity,
            involved_event_ids,
            description,
        }
    }
}

/// Stateless conflict detector.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Detect every conflict between `candidate` and `events`.
    pub fn detect(
        candidate: &Interval,
        events: &[CalendarEvent],
        prefs: &SchedulingPreferences,
    ) -> Vec<ConflictDescriptor> {
        let mut conflicts: Vec<ConflictDescriptor> = Self::overlapping(candidate, events)
            .into_iter()
            .map(|event| {
                ConflictDescriptor::new(
                    ConflictKind::TimeOverlap,
                    containment_severity(candidate, &event.interval, ConflictSeverity::High),
                    vec![event.id.clone()],
                    format!("Overlaps with {}", describe(event)),
                )
            })
            .collect();

        if prefs.overlaps_lunch(candidate) {
            let window = prefs
                .lunch_break()
                .map(|w| w.to_string())
                .unwrap_or_default();
            conflicts.push(ConflictDescriptor::new(
                ConflictKind::LunchOverlap,
                ConflictSeverity::Medium,
                Vec::new(),
                format!("Overlaps the lunch break ({window})"),
            ));
        }

        let buffer = prefs.buffer_between_meetings_minutes();
        if buffer > 0 {
            if let Some(before) = nearest_preceding(candidate, events) {
                let gap = Interval::gap_minutes(&before.interval, candidate);
                if gap < buffer {
                    conflicts.push(ConflictDescriptor::new(
                        ConflictKind::BufferViolation,
                        ConflictSeverity::Low,
                        vec![before.id.clone()],
                        format!(
                            "Only {gap} min after {} (buffer is {buffer} min)",
                            describe(before)
                        ),
                    ));
                }
            }
            if let Some(after) = nearest_following(candidate, events) {
                let gap = Interval::gap_minutes(candidate, &after.interval);
                if gap < buffer {
                    conflicts.push(ConflictDescriptor::new(
                        ConflictKind::BufferViolation,
                        ConflictSeverity::Low,
                        vec![after.id.clone()],
                        format!(
                            "Only {gap} min before {} (buffer is {buffer} min)",
                            describe(after)
                        ),
                    ));
                }
            }
        }

        trace!(candidate = %candidate, found = conflicts.len(), "conflict check");
        conflicts
    }

    /// Events that overlap `candidate`, in input order. No preference checks.
    pub fn overlapping<'a>(candidate: &Interval, events: &'a [CalendarEvent]) -> Vec<&'a CalendarEvent> {
        events
            .iter()
            .filter(|event| event.interval.overlaps(candidate))
            .collect()
    }

    /// Pairwise conflicts inside an event set.
    ///
    /// Overlapping events that share an attendee or a location are resource
    /// conflicts; other overlaps are plain time overlaps. All-day events are
    /// ignored.
    pub fn detect_all(events: &[CalendarEvent]) -> Vec<ConflictDescriptor> {
        let timed: Vec<&CalendarEvent> = events.iter().filter(|e| !e.all_day).collect();
        let mut conflicts = Vec::new();

        for (i, a) in timed.iter().enumerate() {
            for b in &timed[i + 1..] {
                if !a.interval.overlaps(&b.interval) {
                    continue;
                }

                let ids = vec![a.id.clone(), b.id.clone()];
                let descriptor = if a.shares_attendee_with(b) {
                    ConflictDescriptor::new(
                        ConflictKind::ResourceConflict,
                        containment_severity(&a.interval, &b.interval, ConflictSeverity::Critical),
                        ids,
                        format!("{} and {} share attendees", describe(a), describe(b)),
                    )
                } else if a.shares_location_with(b) {
                    ConflictDescriptor::new(
                        ConflictKind::ResourceConflict,
                        containment_severity(&a.interval, &b.interval, ConflictSeverity::Critical),
                        ids,
                        format!(
                            "{} and {} are both booked in {}",
                            describe(a),
                            describe(b),
                            a.location().unwrap_or_default()
                        ),
                    )
                } else {
                    ConflictDescriptor::new(
                        ConflictKind::TimeOverlap,
                        containment_severity(&a.interval, &b.interval, ConflictSeverity::High),
                        ids,
                        format!("{} overlaps {}", describe(a), describe(b)),
                    )
                };
                conflicts.push(descriptor);
            }
        }

        conflicts
    }
}

/// Convenience function for [`ConflictDetector::detect`].
pub fn detect(
    candidate: &Interval,
    events: &[CalendarEvent],
    prefs: &SchedulingPreferences,
) -> Vec<ConflictDescriptor> {
    ConflictDetector::detect(candidate, events, prefs)
}

/// `on_containment` when either interval contains the other, else one step
/// below it.
fn containment_severity(a: &Interval, b: &Interval, on_containment: ConflictSeverity) -> ConflictSeverity {
    if a.contains(b) || b.contains(a) {
        on_containment
    } else {
        match on_containment {
            ConflictSeverity::Critical => ConflictSeverity::High,
            ConflictSeverity::High => ConflictSeverity::Medium,
            _ => ConflictSeverity::Low,
        }
    }
}

/// Event ending last at or before the candidate start (first wins on ties).
pub(crate) fn nearest_preceding<'a>(
    candidate: &Interval,
    events: &'a [CalendarEvent],
) -> Option<&'a CalendarEvent> {
    events
        .iter()
        .filter(|e| e.interval.end() <= candidate.start() && !e.interval.overlaps(candidate))
        .fold(None, |best: Option<&CalendarEvent>, e| match best {
            Some(b) if b.interval.end() >= e.interval.end() => Some(b),
            _ => Some(e),
        })
}

/// Event starting first at or after the candidate end (first wins on ties).
pub(crate) fn nearest_following<'a>(
    candidate: &Interval,
    events: &'a [CalendarEvent],
) -> Option<&'a CalendarEvent> {
    events
        .iter()
        .filter(|e| e.interval.start() >= candidate.end() && !e.interval.overlaps(candidate))
        .fold(None, |best: Option<&CalendarEvent>, e| match best {
            Some(b) if b.interval.start() <= e.interval.start() => Some(b),
            _ => Some(e),
        })
}

fn describe(event: &CalendarEvent) -> String {
    if event.title.is_empty() {
        format!("event {}", event.id)
    } else {
        format!("'{}'", event.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, hour, minute, 0).unwrap()
    }

    fn iv(h1: u32, m1: u32, h2: u32, m2: u32) -> Interval {
        Interval::new(at(h1, m1), at(h2, m2)).unwrap()
    }

    fn event(id: &str, interval: Interval) -> CalendarEvent {
        CalendarEvent::new(id, format!("Event {id}"), interval)
    }

    fn quiet_prefs() -> SchedulingPreferences {
        SchedulingPreferences::builder()
            .lunch_break(None)
            .buffer_between_meetings_minutes(0)
            .build()
            .unwrap()
    }

    #[test]
    fn partial_overlap_is_medium() {
        let events = vec![event("a", iv(9, 30, 10, 30))];
        let conflicts = detect(&iv(9, 0, 10, 0), &events, &quiet_prefs());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::TimeOverlap);
        assert_eq!(conflicts[0].severity, ConflictSeverity::Medium);
        assert_eq!(conflicts[0].involved_event_ids, vec!["a".to_string()]);
    }

    #[test]
    fn containment_either_way_is_high() {
        let events = vec![event("outer", iv(8, 0, 12, 0)), event("inner", iv(9, 15, 9, 45))];
        let conflicts = detect(&iv(9, 0, 10, 0), &events, &quiet_prefs());
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|c| c.severity == ConflictSeverity::High));
    }

    #[test]
    fn touching_events_do_not_conflict() {
        let events = vec![event("a", iv(8, 0, 9, 0)), event("b", iv(10, 0, 11, 0))];
        assert!(detect(&iv(9, 0, 10, 0), &events, &quiet_prefs()).is_empty());
    }

    #[test]
    fn descriptor_order_is_overlap_lunch_buffer() {
        let prefs = SchedulingPreferences::builder()
            .buffer_between_meetings_minutes(15)
            .build()
            .unwrap();
        let events = vec![
            event("after", iv(13, 5, 14, 0)),
            event("overlap", iv(11, 0, 12, 0)),
            event("before", iv(10, 0, 11, 20)),
        ];
        let conflicts = detect(&iv(11, 30, 13, 0), &events, &prefs);
        let kinds: Vec<ConflictKind> = conflicts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConflictKind::TimeOverlap,
                ConflictKind::LunchOverlap,
                ConflictKind::BufferViolation,
                ConflictKind::BufferViolation,
            ]
        );
        assert_eq!(conflicts[0].involved_event_ids, vec!["overlap".to_string()]);
        assert_eq!(conflicts[2].involved_event_ids, vec!["before".to_string()]);
        assert_eq!(conflicts[3].involved_event_ids, vec!["after".to_string()]);
        assert_eq!(conflicts[3].severity, ConflictSeverity::Low);
    }

    #[test]
    fn buffer_violations_on_both_sides() {
        let prefs = SchedulingPreferences::builder()
            .lunch_break(None)
            .buffer_between_meetings_minutes(15)
            .build()
            .unwrap();
        let events = vec![
            event("early", iv(8, 0, 8, 30)),
            event("before", iv(9, 0, 9, 50)),
            event("after", iv(11, 10, 12, 0)),
        ];
        let conflicts = detect(&iv(10, 0, 11, 0), &events, &prefs);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].involved_event_ids, vec!["before".to_string()]);
        assert_eq!(conflicts[1].involved_event_ids, vec!["after".to_string()]);
        assert!(conflicts.iter().all(|c| c.kind == ConflictKind::BufferViolation));
    }

    #[test]
    fn gap_equal_to_buffer_is_fine() {
        let prefs = SchedulingPreferences::builder()
            .lunch_break(None)
            .buffer_between_meetings_minutes(15)
            .build()
            .unwrap();
        let events = vec![event("before", iv(9, 0, 9, 45))];
        assert!(detect(&iv(10, 0, 11, 0), &events, &prefs).is_empty());
    }

    #[test]
    fn detect_all_classifies_resource_conflicts() {
        let events = vec![
            event("a", iv(9, 0, 10, 0)).with_attendees(["ana@example.com"]),
            event("b", iv(9, 30, 10, 30)).with_attendees(["ana@example.com"]),
            event("c", iv(9, 0, 9, 30)).with_location("Room 1"),
            event("d", iv(8, 0, 11, 0)).with_location("room 1"),
            event("holiday", iv(0, 0, 23, 59)).as_all_day(),
        ];
        let conflicts = ConflictDetector::detect_all(&events);

        let find = |x: &str, y: &str| {
            conflicts
                .iter()
                .find(|c| c.involved_event_ids == vec![x.to_string(), y.to_string()])
                .unwrap()
        };
        assert_eq!(find("a", "b").kind, ConflictKind::ResourceConflict);
        assert_eq!(find("a", "b").severity, ConflictSeverity::High);
        assert_eq!(find("c", "d").kind, ConflictKind::ResourceConflict);
        assert_eq!(find("c", "d").severity, ConflictSeverity::Critical);
        assert_eq!(find("a", "c").kind, ConflictKind::TimeOverlap);
        assert_eq!(find("a", "c").severity, ConflictSeverity::High);
        assert!(conflicts
            .iter()
            .all(|c| !c.involved_event_ids.contains(&"holiday".to_string())));
    }
}
