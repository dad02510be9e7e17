//! Candidate slot enumeration and ranking.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{AttendeeId, CalendarEvent};
use crate::interval::Interval;
use crate::preferences::SchedulingPreferences;
use crate::scoring::{timed_events, SlotScorer, TimeSlot};
use crate::tuning;

/// Search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Step between candidate start instants, in minutes.
    pub granularity_minutes: i64,
    /// Maximum number of slots returned.
    pub top_n: usize,
    /// Skip candidates not fully inside the working hours of their local date.
    pub working_hours_only: bool,
    /// Skip candidates on days that already hold `max_meetings_per_day` meetings.
    pub enforce_daily_limit: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: tuning::SEARCH_GRANULARITY_MINUTES,
            top_n: tuning::DEFAULT_TOP_N,
            working_hours_only: false,
            enforce_daily_limit: false,
        }
    }
}

/// Slot search over a range.
#[derive(Debug, Clone, Default)]
pub struct SlotSearch {
    config: SearchConfig,
}

impl SlotSearch {
    /// Create a search with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a search with custom settings.
    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find the best slots of `duration_minutes` inside `range`.
    ///
    /// Candidates start at `range.start` and advance by the configured
    /// granularity; a candidate must end at or before `range.end`. Only slots
    /// scoring above the viability cutoff are kept, ranked by score
    /// (earlier start first on ties) and truncated to `top_n`. A range that
    /// cannot fit the duration yields an empty list.
    pub fn search(
        &self,
        duration_minutes: i64,
        events: &[CalendarEvent],
        range: &Interval,
        prefs: &SchedulingPreferences,
        attendees: &[AttendeeId],
    ) -> Vec<TimeSlot> {
        if duration_minutes <= 0 || self.config.top_n == 0 {
            return Vec::new();
        }
        let Some(step) = Duration::try_minutes(self.config.granularity_minutes.max(1)) else {
            return Vec::new();
        };

        let timed = timed_events(events);
        let daily_meetings = if self.config.enforce_daily_limit {
            meetings_per_day(&timed, prefs)
        } else {
            BTreeMap::new()
        };

        let mut slots = Vec::new();
        let mut examined = 0usize;
        let mut cursor = range.start();

        loop {
            let Ok(candidate) = Interval::starting_at(cursor, duration_minutes) else {
                break;
            };
            if candidate.end() > range.end() {
                break;
            }
            examined += 1;

            if self.admits(&candidate, prefs, &daily_meetings) {
                let slot = SlotScorer::score(&candidate, &timed, prefs, attendees);
                if slot.is_viable() {
                    slots.push(slot);
                }
            }

            match cursor.checked_add_signed(step) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        slots.sort_by(|a, b| b.score().total_cmp(&a.score()));
        slots.truncate(self.config.top_n);

        debug!(
            range = %range,
            duration_minutes,
            examined,
            returned = slots.len(),
            "slot search finished"
        );
        slots
    }

    fn admits(
        &self,
        candidate: &Interval,
        prefs: &SchedulingPreferences,
        daily_meetings: &BTreeMap<NaiveDate, usize>,
    ) -> bool {
        if self.config.working_hours_only && !prefs.within_working_hours(candidate) {
            return false;
        }
        if self.config.enforce_daily_limit {
            let day = prefs.local_date(candidate.start());
            let booked = daily_meetings.get(&day).copied().unwrap_or(0);
            if booked >= prefs.max_meetings_per_day() as usize {
                return false;
            }
        }
        true
    }
}

/// Search with default settings and a custom result limit.
pub fn search(
    duration_minutes: i64,
    events: &[CalendarEvent],
    range: &Interval,
    prefs: &SchedulingPreferences,
    attendees: &[AttendeeId],
    top_n: usize,
) -> Vec<TimeSlot> {
    SlotSearch::with_config(SearchConfig {
        top_n,
        ..SearchConfig::default()
    })
    .search(duration_minutes, events, range, prefs, attendees)
}

fn meetings_per_day(events: &[CalendarEvent], prefs: &SchedulingPreferences) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for event in events.iter().filter(|e| e.is_meeting()) {
        *counts.entry(prefs.local_date(event.interval.start())).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Consideration;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, hour, minute, 0).unwrap()
    }

    fn iv(h1: u32, m1: u32, h2: u32, m2: u32) -> Interval {
        Interval::new(at(h1, m1), at(h2, m2)).unwrap()
    }

    fn workday() -> Interval {
        iv(9, 0, 17, 0)
    }

    #[test]
    fn empty_calendar_prefers_morning() {
        let prefs = SchedulingPreferences::default();
        let slots = SlotSearch::new().search(60, &[], &workday(), &prefs, &[]);
        assert_eq!(slots.len(), 10);

        let best = &slots[0];
        assert!(best.score() >= 0.8);
        assert_eq!(best.interval().start(), at(9, 0));
        assert!(best
            .reasons()
            .contains(&tuning::REASON_PRODUCTIVITY.to_string()));
        assert!(slots.windows(2).all(|w| w[0].score() >= w[1].score()));
    }

    #[test]
    fn candidates_stay_inside_range() {
        let prefs = SchedulingPreferences::default();
        let slots = search(60, &[], &workday(), &prefs, &[], 100);
        // 09:00 through 16:00 at 30 minute steps.
        assert_eq!(slots.len(), 15);
        assert!(slots.iter().all(|s| workday().contains(s.interval())));
    }

    #[test]
    fn range_shorter_than_duration_is_empty() {
        let prefs = SchedulingPreferences::default();
        assert!(search(120, &[], &iv(9, 0, 10, 0), &prefs, &[], 10).is_empty());
        assert!(search(0, &[], &workday(), &prefs, &[], 10).is_empty());
        assert!(search(-30, &[], &workday(), &prefs, &[], 10).is_empty());
    }

    #[test]
    fn never_returns_non_viable_slots() {
        let events = vec![CalendarEvent::new("all", "Offsite", iv(0, 0, 23, 0))
            .with_attendees(["ana@example.com"])];
        let prefs = SchedulingPreferences::builder()
            .avoid_times(&[(0, 24)])
            .preferred_times(&[])
            .focus_block("00:00-24:00", crate::preferences::FocusPriority::High, None)
            .build()
            .unwrap();
        let attendees = vec!["ana@example.com".to_string()];
        // 0.05 productivity + 0.045 time zone + 0.045 focus + 0.1 travel + 0.05 fatigue
        let slots = search(60, &events, &iv(19, 0, 23, 0), &prefs, &attendees, 10);
        assert!(slots.is_empty());
    }

    #[test]
    fn busy_attendee_slots_are_kept_only_above_cutoff() {
        let events = vec![CalendarEvent::new("busy", "Review", iv(9, 0, 12, 0))
            .with_attendees(["ana@example.com"])];
        let attendees = vec!["ana@example.com".to_string()];
        let prefs = SchedulingPreferences::default();
        let slots = search(60, &events, &workday(), &prefs, &attendees, 100);
        for slot in &slots {
            assert!(slot.score() > tuning::VIABILITY_THRESHOLD);
        }
        let blocked = slots
            .iter()
            .find(|s| s.interval().start() == at(10, 0))
            .unwrap();
        assert_eq!(blocked.consideration(Consideration::AttendeeAvailability), Some(0.0));
        assert!(slots[0].interval().start() >= at(12, 0));
    }

    #[test]
    fn working_hours_only_filters_candidates() {
        let prefs = SchedulingPreferences::default();
        let search = SlotSearch::with_config(SearchConfig {
            working_hours_only: true,
            top_n: 100,
            ..SearchConfig::default()
        });
        let slots = search.search(60, &[], &iv(7, 0, 19, 0), &prefs, &[]);
        assert!(slots
            .iter()
            .all(|s| s.interval().start() >= at(9, 0) && s.interval().end() <= at(17, 0)));
        assert_eq!(slots.len(), 15);
    }

    #[test]
    fn daily_limit_blocks_full_days() {
        let prefs = SchedulingPreferences::builder()
            .max_meetings_per_day(1)
            .build()
            .unwrap();
        let events = vec![CalendarEvent::new("one", "Standup", iv(8, 0, 8, 15))];
        let limited = SlotSearch::with_config(SearchConfig {
            enforce_daily_limit: true,
            ..SearchConfig::default()
        });
        assert!(limited.search(30, &events, &workday(), &prefs, &[]).is_empty());
        assert!(!SlotSearch::new().search(30, &events, &workday(), &prefs, &[]).is_empty());
    }

    #[test]
    fn equal_scores_keep_chronological_order() {
        let prefs = SchedulingPreferences::default();
        let slots = search(30, &[], &iv(9, 0, 10, 0), &prefs, &[], 10);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].interval().start(), at(9, 0));
        assert_eq!(slots[1].interval().start(), at(9, 30));
    }
}
