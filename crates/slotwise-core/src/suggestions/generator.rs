use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use super::consolidation::consolidation_groups;
use super::{Suggestion, SuggestionType};
use crate::event::{AttendeeId, CalendarEvent, EventId};
use crate::interval::Interval;
use crate::preferences::SchedulingPreferences;
use crate::scoring::SlotScorer;
use crate::search::SlotSearch;
use crate::tuning;

/// Runs every suggestion strategy over an event set.
///
/// Strategies are independent: consolidation, focus time, conflict
/// resolution, break time and travel buffers, in that order. The merged list
/// is sorted by confidence; on ties the strategy order is kept.
#[derive(Debug, Clone, Default)]
pub struct SuggestionGenerator {
    search: SlotSearch,
}

impl SuggestionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom slot search for the strategies that search.
    pub fn with_search(search: SlotSearch) -> Self {
        Self { search }
    }

    /// Produce suggestions for events inside `range`.
    pub fn generate(
        &self,
        events: &[CalendarEvent],
        range: &Interval,
        prefs: &SchedulingPreferences,
    ) -> Vec<Suggestion> {
        let in_range = events_in_range(events, range);

        let mut suggestions = Vec::new();
        suggestions.extend(self.consolidate(&in_range, events, prefs));
        suggestions.extend(self.focus_time(events, range, prefs));
        suggestions.extend(self.reschedule(&in_range, events, range, prefs));
        suggestions.extend(self.break_time(&in_range, events, prefs));
        suggestions.extend(self.travel_buffers(&in_range, events, prefs));

        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!(
            range = %range,
            events = in_range.len(),
            suggestions = suggestions.len(),
            "suggestions generated"
        );
        suggestions
    }

    /// Best slot for a new meeting, as an `optimal_time` suggestion.
    pub fn optimal_time(
        &self,
        duration_minutes: i64,
        events: &[CalendarEvent],
        range: &Interval,
        prefs: &SchedulingPreferences,
        attendees: &[AttendeeId],
    ) -> Option<Suggestion> {
        let best = self
            .search
            .search(duration_minutes, events, range, prefs, attendees)
            .into_iter()
            .next()?;

        let description = format!(
            "Best {duration_minutes} min slot: {} ({})",
            best.interval(),
            best.reasons().join(", ")
        );
        let confidence = best.score();
        Some(Suggestion::new(
            SuggestionType::OptimalTime,
            best,
            Vec::new(),
            confidence,
            tuning::OPTIMAL_TIME_SAVED_MINUTES,
            "Optimal meeting time".to_string(),
            description,
        ))
    }

    fn consolidate(
        &self,
        in_range: &[CalendarEvent],
        all: &[CalendarEvent],
        prefs: &SchedulingPreferences,
    ) -> Vec<Suggestion> {
        let mut out = Vec::new();

        for group in consolidation_groups(in_range) {
            let Some(start) = group.iter().map(|e| e.interval.start()).min() else {
                continue;
            };
            let total: i64 = group.iter().map(|e| e.interval.duration_minutes()).sum();
            let Ok(block) = Interval::starting_at(start, total) else {
                continue;
            };

            let members: BTreeSet<&str> = group.iter().map(|e| e.id.as_str()).collect();
            let others: Vec<CalendarEvent> = all
                .iter()
                .filter(|e| !members.contains(e.id.as_str()))
                .cloned()
                .collect();
            let attendees: Vec<AttendeeId> = group
                .iter()
                .flat_map(|e| e.attendees.iter().cloned())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let slot = SlotScorer::score(&block, &others, prefs, &attendees);
            let titles: Vec<String> = group.iter().map(|e| display_name(e)).collect();

            out.push(Suggestion::new(
                SuggestionType::Consolidate,
                slot,
                group.iter().map(|e| e.id.clone()).collect(),
                tuning::CONSOLIDATION_CONFIDENCE,
                tuning::CONSOLIDATION_TIME_SAVED_MINUTES,
                format!("Consolidate {} related meetings", group.len()),
                format!("Combine {} into one {total} min block", titles.join(", ")),
            ));
        }

        trace!(count = out.len(), "consolidation suggestions");
        out
    }

    fn focus_time(
        &self,
        events: &[CalendarEvent],
        range: &Interval,
        prefs: &SchedulingPreferences,
    ) -> Option<Suggestion> {
        let best = self
            .search
            .search(tuning::FOCUS_DURATION_MINUTES, events, range, prefs, &[])
            .into_iter()
            .next()?;
        if best.score() < tuning::FOCUS_MIN_SCORE {
            trace!(score = best.score(), "best focus slot below threshold");
            return None;
        }

        let confidence = best.score();
        let description = format!("Protect {} for deep work", best.interval());
        Some(Suggestion::new(
            SuggestionType::FocusTime,
            best,
            Vec::new(),
            confidence,
            tuning::FOCUS_TIME_SAVED_MINUTES,
            format!("Block {} min of focus time", tuning::FOCUS_DURATION_MINUTES),
            description,
        ))
    }

    fn reschedule(
        &self,
        in_range: &[CalendarEvent],
        all: &[CalendarEvent],
        range: &Interval,
        prefs: &SchedulingPreferences,
    ) -> Vec<Suggestion> {
        let mut out = Vec::new();

        for (i, event) in in_range.iter().enumerate() {
            let clashes: Vec<&CalendarEvent> = in_range[..i]
                .iter()
                .filter(|placed| placed.interval.overlaps(&event.interval))
                .collect();
            if clashes.is_empty() {
                continue;
            }

            let others: Vec<CalendarEvent> = all
                .iter()
                .filter(|e| *e != event)
                .cloned()
                .collect();
            let attendees: Vec<AttendeeId> = event.attendees.iter().cloned().collect();
            let duration = event.interval.duration_minutes();

            let Some(best) = self
                .search
                .search(duration, &others, range, prefs, &attendees)
                .into_iter()
                .next()
            else {
                continue;
            };

            let mut related: Vec<EventId> = vec![event.id.clone()];
            related.extend(clashes.iter().map(|e| e.id.clone()));

            let confidence = best.score() * tuning::RESCHEDULE_CONFIDENCE_FACTOR;
            let description = format!(
                "{} overlaps {}; move it to {}",
                display_name(event),
                clashes.iter().map(|e| display_name(e)).collect::<Vec<_>>().join(", "),
                best.interval()
            );
            out.push(Suggestion::new(
                SuggestionType::Reschedule,
                best,
                related,
                confidence,
                tuning::RESCHEDULE_TIME_SAVED_MINUTES,
                format!("Reschedule {}", display_name(event)),
                description,
            ));
        }

        trace!(count = out.len(), "reschedule suggestions");
        out
    }

    fn break_time(
        &self,
        in_range: &[CalendarEvent],
        all: &[CalendarEvent],
        prefs: &SchedulingPreferences,
    ) -> Vec<Suggestion> {
        let buffer = prefs.buffer_between_meetings_minutes();
        let mut out = Vec::new();

        for run in back_to_back_runs(in_range, buffer) {
            let (Some(first), Some(last_end)) = (
                run.first().map(|e| e.interval.start()),
                run.iter().map(|e| e.interval.end()).max(),
            ) else {
                continue;
            };
            let length = (last_end - first).num_minutes();
            if length < tuning::BREAK_AFTER_RUN_MINUTES {
                continue;
            }
            let Ok(slot_interval) = Interval::starting_at(last_end, tuning::BREAK_DURATION_MINUTES) else {
                continue;
            };

            let slot = SlotScorer::score(&slot_interval, all, prefs, &[]);
            out.push(Suggestion::new(
                SuggestionType::BreakTime,
                slot,
                run.iter().map(|e| e.id.clone()).collect(),
                tuning::BREAK_CONFIDENCE,
                tuning::BREAK_TIME_SAVED_MINUTES,
                format!("Take a {} min break", tuning::BREAK_DURATION_MINUTES),
                format!("{} meetings back to back for {length} min", run.len()),
            ));
        }

        trace!(count = out.len(), "break suggestions");
        out
    }

    fn travel_buffers(
        &self,
        in_range: &[CalendarEvent],
        all: &[CalendarEvent],
        prefs: &SchedulingPreferences,
    ) -> Vec<Suggestion> {
        let buffer = prefs.buffer_between_meetings_minutes();
        let mut out = Vec::new();
        if buffer <= 0 {
            return out;
        }

        for (i, from) in in_range.iter().enumerate() {
            let Some(origin) = from.location() else {
                continue;
            };
            // Next located event starting once this one ends.
            let Some(to) = in_range.iter().enumerate().find_map(|(j, e)| {
                (j != i && e.location().is_some() && e.interval.start() >= from.interval.end())
                    .then_some(e)
            }) else {
                continue;
            };
            let Some(destination) = to.location() else {
                continue;
            };
            if from.shares_location_with(to) {
                continue;
            }
            let gap = Interval::gap_minutes(&from.interval, &to.interval);
            if !(0..buffer).contains(&gap) {
                continue;
            }

            let Some(block_start) = Duration::try_minutes(buffer)
                .and_then(|d| to.interval.start().checked_sub_signed(d))
            else {
                continue;
            };
            let Ok(block) = Interval::starting_at(block_start, buffer) else {
                continue;
            };

            let others: Vec<CalendarEvent> = all
                .iter()
                .filter(|e| *e != from && *e != to)
                .cloned()
                .collect();
            let slot = SlotScorer::score(&block, &others, prefs, &[]);

            out.push(Suggestion::new(
                SuggestionType::TravelBuffer,
                slot,
                vec![from.id.clone(), to.id.clone()],
                tuning::TRAVEL_BUFFER_CONFIDENCE,
                tuning::TRAVEL_BUFFER_TIME_SAVED_MINUTES,
                format!("Add travel time before {}", display_name(to)),
                format!("Only {gap} min to get from {origin} to {destination}"),
            ));
        }

        trace!(count = out.len(), "travel buffer suggestions");
        out
    }
}

/// Convenience function for [`SuggestionGenerator::generate`] with default
/// search settings.
pub fn generate(
    events: &[CalendarEvent],
    range: &Interval,
    prefs: &SchedulingPreferences,
) -> Vec<Suggestion> {
    SuggestionGenerator::new().generate(events, range, prefs)
}

/// Convenience function for [`SuggestionGenerator::optimal_time`].
pub fn optimal_time(
    duration_minutes: i64,
    events: &[CalendarEvent],
    range: &Interval,
    prefs: &SchedulingPreferences,
    attendees: &[AttendeeId],
) -> Option<Suggestion> {
    SuggestionGenerator::new().optimal_time(duration_minutes, events, range, prefs, attendees)
}

/// Timed events overlapping `range`, in layout order (start, longer first, id).
fn events_in_range(events: &[CalendarEvent], range: &Interval) -> Vec<CalendarEvent> {
    let mut selected: Vec<CalendarEvent> = events
        .iter()
        .filter(|e| !e.all_day && e.interval.overlaps(range))
        .cloned()
        .collect();
    selected.sort_by(|a, b| {
        a.interval
            .start()
            .cmp(&b.interval.start())
            .then_with(|| b.interval.duration().cmp(&a.interval.duration()))
            .then_with(|| a.id.cmp(&b.id))
    });
    selected
}

/// Split sorted events into runs whose gaps are shorter than `buffer`.
/// Touching events always belong to the same run.
fn back_to_back_runs(sorted: &[CalendarEvent], buffer: i64) -> Vec<Vec<&CalendarEvent>> {
    let mut runs: Vec<Vec<&CalendarEvent>> = Vec::new();
    let mut run_end: Option<DateTime<Utc>> = None;

    for event in sorted {
        let joins = match (run_end, runs.last()) {
            (Some(end), Some(_)) => {
                let gap = (event.interval.start() - end).num_minutes();
                gap <= 0 || gap < buffer
            }
            _ => false,
        };

        if joins {
            if let Some(run) = runs.last_mut() {
                run.push(event);
            }
            run_end = run_end.max(Some(event.interval.end()));
        } else {
            runs.push(vec![event]);
            run_end = Some(event.interval.end());
        }
    }

    runs
}

fn display_name(event: &CalendarEvent) -> String {
    if event.title.is_empty() {
        event.id.clone()
    } else {
        event.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestions::ActionRequired;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, hour, minute, 0).unwrap()
    }

    fn iv(h1: u32, m1: u32, h2: u32, m2: u32) -> Interval {
        Interval::new(at(h1, m1), at(h2, m2)).unwrap()
    }

    fn make_test_event(id: &str, title: &str, interval: Interval) -> CalendarEvent {
        CalendarEvent::new(id, title, interval)
    }

    fn of_kind(suggestions: &[Suggestion], kind: SuggestionType) -> Vec<&Suggestion> {
        suggestions.iter().filter(|s| s.kind == kind).collect()
    }

    #[test]
    fn empty_day_gets_focus_time_only() {
        let prefs = SchedulingPreferences::default();
        let suggestions = generate(&[], &iv(9, 0, 17, 0), &prefs);
        assert_eq!(suggestions.len(), 1);
        let focus = &suggestions[0];
        assert_eq!(focus.kind, SuggestionType::FocusTime);
        assert_eq!(focus.target_slot.interval().start(), at(9, 0));
        assert_eq!(focus.target_slot.interval().duration_minutes(), 120);
        assert_eq!(focus.confidence, focus.target_slot.score());
        assert_eq!(focus.estimated_time_saved_minutes, 60);
        assert_eq!(focus.action_required, ActionRequired::Automatic);
    }

    #[test]
    fn consolidates_related_meetings() {
        let events = vec![
            make_test_event("a", "Apollo planning", iv(9, 0, 9, 30)),
            make_test_event("b", "Apollo review", iv(15, 0, 15, 45)),
        ];
        let prefs = SchedulingPreferences::default();
        let suggestions = generate(&events, &iv(9, 0, 17, 0), &prefs);
        let consolidations = of_kind(&suggestions, SuggestionType::Consolidate);
        assert_eq!(consolidations.len(), 1);

        let suggestion = consolidations[0];
        assert_eq!(suggestion.confidence, tuning::CONSOLIDATION_CONFIDENCE);
        assert_eq!(suggestion.estimated_time_saved_minutes, 30);
        assert_eq!(suggestion.related_event_ids, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(suggestion.target_slot.interval(), &iv(9, 0, 10, 15));
    }

    #[test]
    fn reschedules_the_later_of_two_overlapping_events() {
        let events = vec![
            make_test_event("first", "Design review", iv(10, 0, 11, 0)),
            make_test_event("second", "Budget", iv(10, 30, 11, 0)),
        ];
        let prefs = SchedulingPreferences::default();
        let suggestions = generate(&events, &iv(9, 0, 17, 0), &prefs);
        let moves = of_kind(&suggestions, SuggestionType::Reschedule);
        assert_eq!(moves.len(), 1);

        let suggestion = moves[0];
        assert_eq!(suggestion.related_event_ids, vec!["second".to_string(), "first".to_string()]);
        assert_eq!(suggestion.target_slot.interval().duration_minutes(), 30);
        assert!(!suggestion.target_slot.interval().overlaps(&iv(10, 0, 11, 0)));
        let expected = suggestion.target_slot.score() * tuning::RESCHEDULE_CONFIDENCE_FACTOR;
        assert!((suggestion.confidence - expected).abs() < 1e-9);
        assert_eq!(suggestion.action_required, ActionRequired::UserApproval);
    }

    #[test]
    fn suggests_break_after_long_run() {
        let events = vec![
            make_test_event("m1", "Interview one", iv(9, 0, 10, 0)),
            make_test_event("m2", "Interview two", iv(10, 5, 11, 0)),
            make_test_event("m3", "Interview three", iv(11, 0, 12, 0)),
        ];
        let prefs = SchedulingPreferences::default();
        let suggestions = generate(&events, &iv(8, 0, 18, 0), &prefs);
        let breaks = of_kind(&suggestions, SuggestionType::BreakTime);
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].target_slot.interval(), &iv(12, 0, 12, 15));
        assert_eq!(breaks[0].related_event_ids.len(), 3);
        assert_eq!(breaks[0].confidence, tuning::BREAK_CONFIDENCE);
    }

    #[test]
    fn short_runs_get_no_break() {
        let events = vec![
            make_test_event("m1", "One", iv(9, 0, 10, 0)),
            make_test_event("m2", "Two", iv(10, 0, 11, 0)),
            make_test_event("m3", "Three", iv(11, 30, 12, 30)),
        ];
        let prefs = SchedulingPreferences::default();
        let suggestions = generate(&events, &iv(8, 0, 18, 0), &prefs);
        assert!(of_kind(&suggestions, SuggestionType::BreakTime).is_empty());
    }

    #[test]
    fn suggests_travel_buffer_between_locations() {
        let events = vec![
            make_test_event("office", "Standup", iv(9, 0, 9, 30)).with_location("Office"),
            make_test_event("client", "Client visit", iv(9, 35, 10, 30)).with_location("Client HQ"),
        ];
        let prefs = SchedulingPreferences::default();
        let suggestions = generate(&events, &iv(8, 0, 18, 0), &prefs);
        let travel = of_kind(&suggestions, SuggestionType::TravelBuffer);
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].target_slot.interval(), &iv(9, 20, 9, 35));
        assert_eq!(travel[0].action_required, ActionRequired::Manual);
    }

    #[test]
    fn travel_buffer_looks_past_unlocated_events() {
        let events = vec![
            make_test_event("office", "Standup", iv(9, 0, 10, 0)).with_location("Office"),
            make_test_event("call", "Quick call", iv(9, 15, 9, 30)),
            make_test_event("client", "Client visit", iv(10, 5, 11, 0)).with_location("Client HQ"),
        ];
        let prefs = SchedulingPreferences::default();
        let suggestions = generate(&events, &iv(8, 0, 18, 0), &prefs);
        let travel = of_kind(&suggestions, SuggestionType::TravelBuffer);
        assert_eq!(travel.len(), 1);
        assert_eq!(
            travel[0].related_event_ids,
            vec!["office".to_string(), "client".to_string()]
        );
        assert_eq!(travel[0].target_slot.interval(), &iv(9, 50, 10, 5));
    }

    #[test]
    fn no_focus_time_below_threshold() {
        let prefs = SchedulingPreferences::default();
        let evening = iv(19, 0, 23, 0);

        let best = SlotSearch::new().search(tuning::FOCUS_DURATION_MINUTES, &[], &evening, &prefs, &[]);
        assert!(!best.is_empty());
        assert!(best[0].score() < tuning::FOCUS_MIN_SCORE);

        let suggestions = generate(&[], &evening, &prefs);
        assert!(of_kind(&suggestions, SuggestionType::FocusTime).is_empty());
    }

    #[test]
    fn sorted_by_confidence_and_deterministic() {
        let events = vec![
            make_test_event("a", "Apollo planning", iv(9, 0, 10, 0)).with_location("Office"),
            make_test_event("b", "Apollo sync", iv(9, 30, 10, 30)),
            make_test_event("c", "Offsite", iv(10, 35, 12, 0)).with_location("Park"),
        ];
        let prefs = SchedulingPreferences::default();
        let first = generate(&events, &iv(8, 0, 18, 0), &prefs);
        let second = generate(&events, &iv(8, 0, 18, 0), &prefs);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn optimal_time_wraps_best_slot() {
        let prefs = SchedulingPreferences::default();
        let suggestion = optimal_time(60, &[], &iv(9, 0, 17, 0), &prefs, &[]).unwrap();
        assert_eq!(suggestion.kind, SuggestionType::OptimalTime);
        assert_eq!(suggestion.target_slot.interval().start(), at(9, 0));
        assert_eq!(suggestion.confidence, suggestion.target_slot.score());
        assert!(optimal_time(600, &[], &iv(9, 0, 17, 0), &prefs, &[]).is_none());
    }
}
