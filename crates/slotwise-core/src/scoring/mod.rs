//! Weighted slot scoring.
//!
//! A candidate slot is rated on six [`Consideration`]s, each in `[0, 1]`, and
//! the weighted sum becomes the slot's score. Weights and rule values live in
//! [`crate::tuning`].

mod scorer;

pub use scorer::{score, SlotScorer};
pub(crate) use scorer::timed_events;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conflict::ConflictDescriptor;
use crate::interval::Interval;
use crate::tuning;

/// One of the criteria a slot is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consideration {
    AttendeeAvailability,
    ProductivityAlignment,
    TimeZoneFriendliness,
    FocusTimeProtection,
    TravelTimeBuffer,
    MeetingFatigue,
}

impl Consideration {
    /// Every consideration, in scoring order.
    pub const ALL: [Consideration; 6] = [
        Consideration::AttendeeAvailability,
        Consideration::ProductivityAlignment,
        Consideration::TimeZoneFriendliness,
        Consideration::FocusTimeProtection,
        Consideration::TravelTimeBuffer,
        Consideration::MeetingFatigue,
    ];

    pub fn weight(self) -> f64 {
        match self {
            Self::AttendeeAvailability => tuning::WEIGHT_ATTENDEE_AVAILABILITY,
            Self::ProductivityAlignment => tuning::WEIGHT_PRODUCTIVITY_ALIGNMENT,
            Self::TimeZoneFriendliness => tuning::WEIGHT_TIME_ZONE_FRIENDLINESS,
            Self::FocusTimeProtection => tuning::WEIGHT_FOCUS_TIME_PROTECTION,
            Self::TravelTimeBuffer => tuning::WEIGHT_TRAVEL_TIME_BUFFER,
            Self::MeetingFatigue => tuning::WEIGHT_MEETING_FATIGUE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttendeeAvailability => "attendee_availability",
            Self::ProductivityAlignment => "productivity_alignment",
            Self::TimeZoneFriendliness => "time_zone_friendliness",
            Self::FocusTimeProtection => "focus_time_protection",
            Self::TravelTimeBuffer => "travel_time_buffer",
            Self::MeetingFatigue => "meeting_fatigue",
        }
    }
}

impl std::fmt::Display for Consideration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted contribution of one consideration, for explaining a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsiderationTerm {
    pub consideration: Consideration,
    /// Fixed weight (0.0 to 1.0)
    pub weight: f64,
    /// Raw score (0.0 to 1.0, higher is better)
    pub score: f64,
    /// `weight * score`
    pub contribution: f64,
}

/// A scored candidate slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    interval: Interval,
    score: f64,
    reasons: Vec<String>,
    considerations: BTreeMap<Consideration, f64>,
    conflicts: Vec<ConflictDescriptor>,
}

impl TimeSlot {
    pub(crate) fn new(
        interval: Interval,
        score: f64,
        reasons: Vec<String>,
        considerations: BTreeMap<Consideration, f64>,
        conflicts: Vec<ConflictDescriptor>,
    ) -> Self {
        Self {
            interval,
            score,
            reasons,
            considerations,
            conflicts,
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Total weighted score in `[0, 1]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn considerations(&self) -> &BTreeMap<Consideration, f64> {
        &self.considerations
    }

    /// Raw score of a single consideration.
    pub fn consideration(&self, consideration: Consideration) -> Option<f64> {
        self.considerations.get(&consideration).copied()
    }

    pub fn conflicts(&self) -> &[ConflictDescriptor] {
        &self.conflicts
    }

    /// Whether the slot clears the search viability cutoff.
    pub fn is_viable(&self) -> bool {
        self.score > tuning::VIABILITY_THRESHOLD
    }

    /// Per-consideration contributions, largest first.
    pub fn breakdown(&self) -> Vec<ConsiderationTerm> {
        let mut terms: Vec<ConsiderationTerm> = self
            .considerations
            .iter()
            .map(|(&consideration, &score)| ConsiderationTerm {
                consideration,
                weight: consideration.weight(),
                score,
                contribution: consideration.weight() * score,
            })
            .collect();
        terms.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
        terms
    }
}
