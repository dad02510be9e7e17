use tracing::debug;

use super::lanes::{LaneAssigner, LaneAssignment};
use crate::event::CalendarEvent;
use crate::interval::Interval;

/// Project events onto a visible span.
///
/// Events that do not touch the span are dropped. All-day and zero-duration
/// events are stretched to cover the whole span; everything else is clipped
/// to it.
pub fn normalize_to_span(events: &[CalendarEvent], span: &Interval) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter_map(|event| {
            let interval = event.interval;
            let touches = interval.overlaps(span)
                || (interval.is_empty() && span.contains_instant(interval.start()));
            if !touches {
                return None;
            }

            let mut normalized = event.clone();
            normalized.interval = if event.all_day || interval.is_empty() {
                *span
            } else {
                interval.intersection(span)?
            };
            Some(normalized)
        })
        .collect()
}

/// Normalize events onto `span` and assign lanes.
pub fn layout_span(events: &[CalendarEvent], span: &Interval) -> LaneAssignment {
    let normalized = normalize_to_span(events, span);
    debug!(
        span = %span,
        input = events.len(),
        visible = normalized.len(),
        "laying out span"
    );
    LaneAssigner::assign(&normalized)
}
