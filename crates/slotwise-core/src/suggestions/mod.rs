//! Higher-level scheduling suggestions.
//!
//! Each strategy in [`SuggestionGenerator`] looks at the event set on its own
//! and produces zero or more [`Suggestion`]s. Results are merged and ranked by
//! confidence.

mod consolidation;
mod generator;

pub use consolidation::{consolidation_groups, consolidation_key};
pub use generator::{generate, optimal_time, SuggestionGenerator};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::EventId;
use crate::scoring::TimeSlot;
use crate::tuning;

/// Namespace for suggestion ids.
const SUGGESTION_NAMESPACE: Uuid = Uuid::from_u128(0x6c1d_2f0e_93a4_4b57_8e21_5f3a_9c0d_7b14);

/// Kind of suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    OptimalTime,
    Reschedule,
    Consolidate,
    FocusTime,
    BreakTime,
    TravelBuffer,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OptimalTime => "optimal_time",
            Self::Reschedule => "reschedule",
            Self::Consolidate => "consolidate",
            Self::FocusTime => "focus_time",
            Self::BreakTime => "break_time",
            Self::TravelBuffer => "travel_buffer",
        }
    }

    /// What the user has to do to apply a suggestion of this kind.
    pub fn action_required(&self) -> ActionRequired {
        match self {
            Self::OptimalTime | Self::Reschedule | Self::Consolidate => ActionRequired::UserApproval,
            Self::FocusTime | Self::BreakTime => ActionRequired::Automatic,
            Self::TravelBuffer => ActionRequired::Manual,
        }
    }

    pub fn impact(&self) -> Impact {
        let (productivity_gain, attendee_satisfaction, schedule_efficiency) = match self {
            Self::OptimalTime => tuning::IMPACT_OPTIMAL_TIME,
            Self::Reschedule => tuning::IMPACT_RESCHEDULE,
            Self::Consolidate => tuning::IMPACT_CONSOLIDATE,
            Self::FocusTime => tuning::IMPACT_FOCUS_TIME,
            Self::BreakTime => tuning::IMPACT_BREAK_TIME,
            Self::TravelBuffer => tuning::IMPACT_TRAVEL_BUFFER,
        };
        Impact {
            productivity_gain,
            attendee_satisfaction,
            schedule_efficiency,
        }
    }
}

impl std::fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a suggestion gets applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionRequired {
    Automatic,
    UserApproval,
    Manual,
}

/// Expected effect of a suggestion, each value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub productivity_gain: f64,
    pub attendee_satisfaction: f64,
    pub schedule_efficiency: f64,
}

/// A typed scheduling suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable id: identical input yields identical ids.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub title: String,
    pub description: String,
    pub target_slot: TimeSlot,
    pub impact: Impact,
    pub action_required: ActionRequired,
    pub estimated_time_saved_minutes: i64,
    /// Confidence (0.0 to 1.0)
    pub confidence: f64,
    pub related_event_ids: Vec<EventId>,
}

impl Suggestion {
    pub(crate) fn new(
        kind: SuggestionType,
        target_slot: TimeSlot,
        related_event_ids: Vec<EventId>,
        confidence: f64,
        estimated_time_saved_minutes: i64,
        title: String,
        description: String,
    ) -> Self {
        Self {
            id: suggestion_id(kind, &related_event_ids, &target_slot),
            kind,
            title,
            description,
            impact: kind.impact(),
            action_required: kind.action_required(),
            estimated_time_saved_minutes,
            confidence: confidence.clamp(0.0, 1.0),
            related_event_ids,
            target_slot,
        }
    }
}

fn suggestion_id(kind: SuggestionType, related: &[EventId], slot: &TimeSlot) -> String {
    let name = format!(
        "{}|{}|{}",
        kind.as_str(),
        related.join(","),
        slot.interval().start().to_rfc3339()
    );
    Uuid::new_v5(&SUGGESTION_NAMESPACE, name.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip_through_serde() {
        for kind in [
            SuggestionType::OptimalTime,
            SuggestionType::Reschedule,
            SuggestionType::Consolidate,
            SuggestionType::FocusTime,
            SuggestionType::BreakTime,
            SuggestionType::TravelBuffer,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn action_kinds() {
        assert_eq!(SuggestionType::FocusTime.action_required(), ActionRequired::Automatic);
        assert_eq!(SuggestionType::Reschedule.action_required(), ActionRequired::UserApproval);
        assert_eq!(SuggestionType::TravelBuffer.action_required(), ActionRequired::Manual);
    }
}
