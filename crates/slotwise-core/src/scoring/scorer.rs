use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::{Consideration, TimeSlot};
use crate::conflict::{nearest_following, nearest_preceding, ConflictDetector};
use crate::event::{AttendeeId, CalendarEvent};
use crate::interval::Interval;
use crate::preferences::SchedulingPreferences;
use crate::tuning;

/// Stateless slot scorer.
///
/// All-day events never block a slot: they are ignored for availability,
/// travel, fatigue and conflict checks.
pub struct SlotScorer;

impl SlotScorer {
    /// Score `candidate` against the calendar and preferences.
    ///
    /// `attendees` are the people invited to the meeting being placed. With
    /// no attendees the calendar owner is the only participant, so any
    /// overlapping event makes the slot unavailable.
    pub fn score(
        candidate: &Interval,
        events: &[CalendarEvent],
        prefs: &SchedulingPreferences,
        attendees: &[AttendeeId],
    ) -> TimeSlot {
        let timed = timed_events(events);
        let hour = prefs.local_hour(candidate.start());

        let mut considerations = BTreeMap::new();
        considerations.insert(
            Consideration::AttendeeAvailability,
            attendee_availability(candidate, &timed, attendees),
        );
        considerations.insert(
            Consideration::ProductivityAlignment,
            productivity_alignment(hour, prefs),
        );
        considerations.insert(
            Consideration::TimeZoneFriendliness,
            time_zone_friendliness(hour),
        );
        considerations.insert(
            Consideration::FocusTimeProtection,
            focus_time_protection(candidate, prefs),
        );
        considerations.insert(
            Consideration::TravelTimeBuffer,
            travel_time_buffer(candidate, &timed),
        );
        considerations.insert(
            Consideration::MeetingFatigue,
            meeting_fatigue(candidate, &timed, prefs),
        );

        let total: f64 = considerations
            .iter()
            .map(|(consideration, value)| consideration.weight() * value)
            .sum();
        let total = total.clamp(0.0, 1.0);

        let reasons = reasons_for(&considerations);
        let conflicts = ConflictDetector::detect(candidate, &timed, prefs);

        trace!(candidate = %candidate, score = total, "slot scored");
        TimeSlot::new(*candidate, total, reasons, considerations, conflicts)
    }
}

/// Convenience function for [`SlotScorer::score`].
pub fn score(
    candidate: &Interval,
    events: &[CalendarEvent],
    prefs: &SchedulingPreferences,
    attendees: &[AttendeeId],
) -> TimeSlot {
    SlotScorer::score(candidate, events, prefs, attendees)
}

/// Drop all-day events, borrowing when there are none.
pub(crate) fn timed_events(events: &[CalendarEvent]) -> Cow<'_, [CalendarEvent]> {
    if events.iter().any(|e| e.all_day) {
        Cow::Owned(events.iter().filter(|e| !e.all_day).cloned().collect())
    } else {
        Cow::Borrowed(events)
    }
}

fn attendee_availability(candidate: &Interval, timed: &[CalendarEvent], attendees: &[AttendeeId]) -> f64 {
    let overlapping = ConflictDetector::overlapping(candidate, timed);

    let invited: BTreeSet<&AttendeeId> = attendees.iter().collect();
    if invited.is_empty() {
        return if overlapping.is_empty() { 1.0 } else { 0.0 };
    }

    let busy = invited
        .iter()
        .filter(|attendee| overlapping.iter().any(|e| e.attendees.contains(**attendee)))
        .count();
    (1.0 - busy as f64 / invited.len() as f64).max(0.0)
}

fn productivity_alignment(hour: u32, prefs: &SchedulingPreferences) -> f64 {
    if prefs.is_preferred_hour(hour) {
        if prefs.productivity().matches_hour(hour) {
            tuning::PRODUCTIVITY_PROFILE_MATCH
        } else {
            tuning::PRODUCTIVITY_PREFERRED
        }
    } else if prefs.is_avoided_hour(hour) {
        tuning::PRODUCTIVITY_AVOIDED
    } else {
        tuning::PRODUCTIVITY_NEUTRAL
    }
}

fn time_zone_friendliness(hour: u32) -> f64 {
    tuning::TIME_ZONE_BANDS
        .iter()
        .find(|(first, last, _)| *first <= hour && hour <= *last)
        .map(|(_, _, value)| *value)
        .unwrap_or(tuning::TIME_ZONE_OUTSIDE)
}

fn focus_time_protection(candidate: &Interval, prefs: &SchedulingPreferences) -> f64 {
    if prefs.overlaps_high_priority_focus(candidate) {
        tuning::FOCUS_BLOCK_OVERLAP
    } else {
        1.0
    }
}

fn travel_time_buffer(candidate: &Interval, timed: &[CalendarEvent]) -> f64 {
    let mut value = 1.0;
    if nearest_preceding(candidate, timed).is_some_and(|e| e.location().is_some()) {
        value -= tuning::TRAVEL_LOCATION_PENALTY;
    }
    if nearest_following(candidate, timed).is_some_and(|e| e.location().is_some()) {
        value -= tuning::TRAVEL_LOCATION_PENALTY;
    }
    f64::max(value, 0.0)
}

fn meeting_fatigue(candidate: &Interval, timed: &[CalendarEvent], prefs: &SchedulingPreferences) -> f64 {
    let day = prefs.local_date(candidate.start());
    let meetings = timed
        .iter()
        .filter(|e| e.is_meeting() && prefs.local_date(e.interval.start()) == day)
        .count();

    tuning::FATIGUE_BREAKPOINTS
        .iter()
        .find(|(max, _)| meetings <= *max)
        .map(|(_, value)| *value)
        .unwrap_or(tuning::FATIGUE_FLOOR)
}

fn reasons_for(considerations: &BTreeMap<Consideration, f64>) -> Vec<String> {
    let value = |c: Consideration| considerations.get(&c).copied().unwrap_or(0.0);

    let rules = [
        (
            value(Consideration::AttendeeAvailability) > tuning::REASON_AVAILABILITY_ABOVE,
            tuning::REASON_HIGH_AVAILABILITY,
        ),
        (
            value(Consideration::ProductivityAlignment) > tuning::REASON_PRODUCTIVITY_ABOVE,
            tuning::REASON_PRODUCTIVITY,
        ),
        (
            value(Consideration::TimeZoneFriendliness) > tuning::REASON_TIME_ZONE_ABOVE,
            tuning::REASON_TIME_ZONE,
        ),
        (
            value(Consideration::FocusTimeProtection) < tuning::REASON_FOCUS_BELOW,
            tuning::REASON_FOCUS_CONFLICT,
        ),
        (
            value(Consideration::TravelTimeBuffer) < tuning::REASON_TRAVEL_BELOW,
            tuning::REASON_TIGHT_TRAVEL,
        ),
        (
            value(Consideration::MeetingFatigue) < tuning::REASON_FATIGUE_BELOW,
            tuning::REASON_HEAVY_DAY,
        ),
    ];

    let reasons: Vec<String> = rules
        .iter()
        .filter(|(fired, _)| *fired)
        .map(|(_, reason)| reason.to_string())
        .collect();

    if reasons.is_empty() {
        vec![tuning::REASON_DEFAULT.to_string()]
    } else {
        reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictKind;
    use crate::preferences::{FocusPriority, ProductivityProfile};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, hour, minute, 0).unwrap()
    }

    fn iv(h1: u32, m1: u32, h2: u32, m2: u32) -> Interval {
        Interval::new(at(h1, m1), at(h2, m2)).unwrap()
    }

    fn make_test_event(id: &str, interval: Interval) -> CalendarEvent {
        CalendarEvent::new(id, format!("Event {id}"), interval)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_calendar_morning_slot() {
        let slot = score(&iv(9, 0, 10, 0), &[], &SchedulingPreferences::default(), &[]);
        assert_eq!(slot.consideration(Consideration::AttendeeAvailability), Some(1.0));
        assert_eq!(slot.consideration(Consideration::ProductivityAlignment), Some(1.0));
        assert_eq!(slot.consideration(Consideration::TimeZoneFriendliness), Some(1.0));
        assert!(close(slot.score(), 1.0));
        assert_eq!(
            slot.reasons(),
            &[
                tuning::REASON_HIGH_AVAILABILITY.to_string(),
                tuning::REASON_PRODUCTIVITY.to_string(),
                tuning::REASON_TIME_ZONE.to_string(),
            ]
        );
        assert!(slot.conflicts().is_empty());
    }

    #[test]
    fn productivity_rules() {
        let prefs = SchedulingPreferences::default();
        assert_eq!(productivity_alignment(9, &prefs), 1.0);
        // Preferred but outside the morning period.
        assert_eq!(productivity_alignment(14, &prefs), 0.9);
        assert_eq!(productivity_alignment(12, &prefs), 0.2);
        assert_eq!(productivity_alignment(17, &prefs), 0.6);

        let afternoon = SchedulingPreferences::builder()
            .productivity(ProductivityProfile {
                morning_person: false,
                afternoon_person: true,
                evening_person: false,
            })
            .build()
            .unwrap();
        assert_eq!(productivity_alignment(14, &afternoon), 1.0);
        assert_eq!(productivity_alignment(9, &afternoon), 0.9);
    }

    #[test]
    fn time_zone_bands_are_inclusive() {
        assert_eq!(time_zone_friendliness(9), 1.0);
        assert_eq!(time_zone_friendliness(16), 1.0);
        assert_eq!(time_zone_friendliness(17), 0.8);
        assert_eq!(time_zone_friendliness(7), 0.6);
        assert_eq!(time_zone_friendliness(18), 0.6);
        assert_eq!(time_zone_friendliness(19), 0.3);
        assert_eq!(time_zone_friendliness(3), 0.3);
    }

    #[test]
    fn busy_attendee_lowers_availability() {
        let events = vec![
            make_test_event("busy", iv(9, 0, 11, 0)).with_attendees(["ana@example.com"]),
        ];
        let prefs = SchedulingPreferences::default();

        let both = vec!["ana@example.com".to_string(), "bo@example.com".to_string()];
        let slot = score(&iv(9, 30, 10, 30), &events, &prefs, &both);
        assert_eq!(slot.consideration(Consideration::AttendeeAvailability), Some(0.5));

        let only_ana = vec!["ana@example.com".to_string()];
        let slot = score(&iv(9, 30, 10, 30), &events, &prefs, &only_ana);
        assert_eq!(slot.consideration(Consideration::AttendeeAvailability), Some(0.0));
        assert_eq!(slot.conflicts()[0].kind, ConflictKind::TimeOverlap);
        // 0.25 + 0.15 + 0.15 + 0.10 + 0.05 with availability gone.
        assert!(close(slot.score(), 0.70));
    }

    #[test]
    fn owner_only_availability() {
        let events = vec![make_test_event("own", iv(9, 0, 9, 30))];
        let prefs = SchedulingPreferences::default();
        let slot = score(&iv(9, 0, 10, 0), &events, &prefs, &[]);
        assert_eq!(slot.consideration(Consideration::AttendeeAvailability), Some(0.0));
        let free = score(&iv(10, 0, 11, 0), &events, &prefs, &[]);
        assert_eq!(free.consideration(Consideration::AttendeeAvailability), Some(1.0));
    }

    #[test]
    fn all_day_events_do_not_block() {
        let events = vec![make_test_event("holiday", iv(0, 0, 23, 0)).as_all_day()];
        let slot = score(&iv(9, 0, 10, 0), &events, &SchedulingPreferences::default(), &[]);
        assert_eq!(slot.consideration(Consideration::AttendeeAvailability), Some(1.0));
        assert!(slot.conflicts().is_empty());
    }

    #[test]
    fn travel_penalty_per_located_neighbour() {
        let events = vec![
            make_test_event("before", iv(8, 0, 9, 0)).with_location("Office"),
            make_test_event("after", iv(11, 0, 12, 0)).with_location("Client"),
        ];
        let prefs = SchedulingPreferences::default();
        let slot = score(&iv(9, 30, 10, 30), &events, &prefs, &[]);
        let travel = slot.consideration(Consideration::TravelTimeBuffer).unwrap();
        assert!(close(travel, 0.4));
        assert!(slot.reasons().contains(&tuning::REASON_TIGHT_TRAVEL.to_string()));
    }

    #[test]
    fn fatigue_counts_same_day_meetings() {
        let mut events: Vec<CalendarEvent> = (0..6)
            .map(|i| make_test_event(&format!("m{i}"), iv(13 + i, 0, 13 + i, 30)))
            .collect();
        events.push(
            make_test_event("note", iv(8, 0, 8, 30)).with_category(crate::event::EventCategory::Note),
        );
        let prefs = SchedulingPreferences::default();
        let slot = score(&iv(9, 0, 10, 0), &events, &prefs, &[]);
        assert_eq!(slot.consideration(Consideration::MeetingFatigue), Some(0.6));
        assert!(slot.reasons().contains(&tuning::REASON_HEAVY_DAY.to_string()));
    }

    #[test]
    fn focus_block_protection() {
        let prefs = SchedulingPreferences::builder()
            .focus_block("09:00-11:00", FocusPriority::High, None)
            .build()
            .unwrap();
        let slot = score(&iv(10, 0, 11, 0), &[], &prefs, &[]);
        assert_eq!(slot.consideration(Consideration::FocusTimeProtection), Some(0.3));
        assert!(slot.reasons().contains(&tuning::REASON_FOCUS_CONFLICT.to_string()));
    }

    #[test]
    fn default_reason_when_nothing_fires() {
        let events = vec![make_test_event("busy", iv(18, 0, 20, 0))];
        // 19:00 is neutral for productivity and outside every friendly band.
        let slot = score(&iv(19, 0, 19, 30), &events, &SchedulingPreferences::default(), &[]);
        assert_eq!(slot.reasons(), &[tuning::REASON_DEFAULT.to_string()]);
    }

    #[test]
    fn breakdown_sorted_by_contribution() {
        let slot = score(&iv(9, 0, 10, 0), &[], &SchedulingPreferences::default(), &[]);
        let terms = slot.breakdown();
        assert_eq!(terms.len(), 6);
        assert_eq!(terms[0].consideration, Consideration::AttendeeAvailability);
        assert!(terms.windows(2).all(|w| w[0].contribution >= w[1].contribution));
        let sum: f64 = terms.iter().map(|t| t.contribution).sum();
        assert!(close(sum, slot.score()));
    }
}
