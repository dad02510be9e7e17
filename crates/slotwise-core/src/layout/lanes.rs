use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::event::{CalendarEvent, EventId};

/// Lane index per event plus the number of lanes used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneAssignment {
    pub lanes: BTreeMap<EventId, usize>,
    pub lane_count: usize,
}

impl LaneAssignment {
    /// Lane of an event, if it was laid out.
    pub fn lane_of(&self, id: &str) -> Option<usize> {
        self.lanes.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// Greedy interval-graph colouring.
///
/// Events are placed in start order (longer first, then by id on ties), each
/// into the lowest lane whose last event has already ended. This uses exactly
/// as many lanes as the maximum number of simultaneously overlapping events.
pub struct LaneAssigner;

impl LaneAssigner {
    /// Assign every event a lane.
    ///
    /// Zero-duration and all-day events must be normalized onto the span
    /// first (see [`super::normalize_to_span`]); the lane count equals
    /// [`max_overlap`] only for normalized input.
    pub fn assign(events: &[CalendarEvent]) -> LaneAssignment {
        let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
        sorted.sort_by(|a, b| layout_order(a, b));

        let mut lane_ends: Vec<DateTime<Utc>> = Vec::new();
        let mut lanes = BTreeMap::new();

        for event in sorted {
            let start = event.interval.start();
            let lane = match lane_ends.iter().position(|end| *end <= start) {
                Some(free) => {
                    lane_ends[free] = event.interval.end();
                    free
                }
                None => {
                    lane_ends.push(event.interval.end());
                    lane_ends.len() - 1
                }
            };

            if let Some(previous) = lanes.insert(event.id.clone(), lane) {
                warn!(id = %event.id, previous, lane, "duplicate event id in layout");
            }
        }

        debug!(events = events.len(), lanes = lane_ends.len(), "lanes assigned");

        LaneAssignment {
            lanes,
            lane_count: lane_ends.len(),
        }
    }
}

/// Convenience function for [`LaneAssigner::assign`].
pub fn assign(events: &[CalendarEvent]) -> LaneAssignment {
    LaneAssigner::assign(events)
}

/// Maximum number of events overlapping at any instant.
///
/// Sweep line over start/end points; at equal instants ends are processed
/// before starts, so touching events do not count as overlapping.
///
/// Expects events normalized with [`super::normalize_to_span`]. Zero-length
/// events are skipped here, while [`LaneAssigner::assign`] still gives an
/// unnormalized one a lane, so the two only agree after normalizing.
pub fn max_overlap(events: &[CalendarEvent]) -> usize {
    let mut points: Vec<(DateTime<Utc>, i32)> = events
        .iter()
        .filter(|e| !e.interval.is_empty())
        .flat_map(|e| [(e.interval.start(), 1), (e.interval.end(), -1)])
        .collect();
    // -1 sorts before +1 at the same instant.
    points.sort();

    let mut current = 0i32;
    let mut max = 0i32;
    for (_, delta) in points {
        current += delta;
        max = max.max(current);
    }
    max as usize
}

fn layout_order(a: &CalendarEvent, b: &CalendarEvent) -> Ordering {
    a.interval
        .start()
        .cmp(&b.interval.start())
        .then_with(|| b.interval.duration().cmp(&a.interval.duration()))
        .then_with(|| a.id.cmp(&b.id))
}
