//! Heuristic constants for scoring, search and suggestions.
//!
//! Every weight, threshold and breakpoint used by the scheduling engine lives
//! here so tests can assert against the table directly. Changing any value
//! means bumping [`TUNING_VERSION`]: scores are only comparable between runs
//! that used the same version.

/// Version of this constants table.
pub const TUNING_VERSION: u32 = 1;

// ============================================================================
// Consideration weights
// ============================================================================

pub const WEIGHT_ATTENDEE_AVAILABILITY: f64 = 0.30;
pub const WEIGHT_PRODUCTIVITY_ALIGNMENT: f64 = 0.25;
pub const WEIGHT_TIME_ZONE_FRIENDLINESS: f64 = 0.15;
pub const WEIGHT_FOCUS_TIME_PROTECTION: f64 = 0.15;
pub const WEIGHT_TRAVEL_TIME_BUFFER: f64 = 0.10;
pub const WEIGHT_MEETING_FATIGUE: f64 = 0.05;

// ============================================================================
// Consideration rules
// ============================================================================

/// Productivity alignment: hour in a preferred range that matches the profile.
pub const PRODUCTIVITY_PROFILE_MATCH: f64 = 1.0;
/// Productivity alignment: hour in any preferred range.
pub const PRODUCTIVITY_PREFERRED: f64 = 0.9;
/// Productivity alignment: hour in an avoided range.
pub const PRODUCTIVITY_AVOIDED: f64 = 0.2;
/// Productivity alignment: none of the above.
pub const PRODUCTIVITY_NEUTRAL: f64 = 0.6;

/// Time-zone friendliness bands: (first hour, last hour, score), inclusive,
/// checked in order.
pub const TIME_ZONE_BANDS: [(u32, u32, f64); 3] = [(9, 16, 1.0), (8, 17, 0.8), (7, 18, 0.6)];
/// Time-zone friendliness outside every band.
pub const TIME_ZONE_OUTSIDE: f64 = 0.3;

/// Focus-time protection when the slot hits a high-priority focus block.
pub const FOCUS_BLOCK_OVERLAP: f64 = 0.3;

/// Travel buffer penalty per adjacent event that has a location.
pub const TRAVEL_LOCATION_PENALTY: f64 = 0.3;

/// Meeting fatigue curve: (max same-day meetings, score), checked in order.
pub const FATIGUE_BREAKPOINTS: [(usize, f64); 3] = [(3, 1.0), (5, 0.8), (7, 0.6)];
/// Meeting fatigue beyond the last breakpoint.
pub const FATIGUE_FLOOR: f64 = 0.4;

/// Productivity profile periods, `[start, end)` local hours.
pub const MORNING_HOURS: (u32, u32) = (6, 12);
pub const AFTERNOON_HOURS: (u32, u32) = (12, 17);
pub const EVENING_HOURS: (u32, u32) = (17, 22);

// ============================================================================
// Reasons
// ============================================================================

pub const REASON_AVAILABILITY_ABOVE: f64 = 0.8;
pub const REASON_PRODUCTIVITY_ABOVE: f64 = 0.8;
pub const REASON_TIME_ZONE_ABOVE: f64 = 0.8;
pub const REASON_FOCUS_BELOW: f64 = 0.5;
pub const REASON_TRAVEL_BELOW: f64 = 0.5;
pub const REASON_FATIGUE_BELOW: f64 = 0.7;

pub const REASON_HIGH_AVAILABILITY: &str = "High attendee availability";
pub const REASON_PRODUCTIVITY: &str = "Aligns with productivity patterns";
pub const REASON_TIME_ZONE: &str = "Time zone friendly";
pub const REASON_FOCUS_CONFLICT: &str = "Overlaps protected focus time";
pub const REASON_TIGHT_TRAVEL: &str = "Tight travel window";
pub const REASON_HEAVY_DAY: &str = "Heavy meeting day";
pub const REASON_DEFAULT: &str = "Available time slot";

// ============================================================================
// Search
// ============================================================================

/// Slots scoring at or below this are not viable and never returned.
pub const VIABILITY_THRESHOLD: f64 = 0.3;
/// Step between candidate start instants.
pub const SEARCH_GRANULARITY_MINUTES: i64 = 30;
/// Default number of ranked slots returned.
pub const DEFAULT_TOP_N: usize = 10;

// ============================================================================
// Suggestions
// ============================================================================

pub const CONSOLIDATION_CONFIDENCE: f64 = 0.85;
pub const CONSOLIDATION_TIME_SAVED_MINUTES: i64 = 30;
/// Title tokens shorter than this never group events.
pub const CONSOLIDATION_MIN_TOKEN_LEN: usize = 3;
/// Leading title words that are too common to group events.
pub const CONSOLIDATION_STOP_WORDS: [&str; 12] = [
    "the", "and", "for", "with", "meeting", "call", "sync", "chat", "re", "fw", "fwd", "weekly",
];

pub const FOCUS_DURATION_MINUTES: i64 = 120;
pub const FOCUS_MIN_SCORE: f64 = 0.8;
pub const FOCUS_TIME_SAVED_MINUTES: i64 = 60;

/// Reschedule confidence is the alternative slot's score times this factor.
pub const RESCHEDULE_CONFIDENCE_FACTOR: f64 = 0.9;
pub const RESCHEDULE_TIME_SAVED_MINUTES: i64 = 15;

/// Back-to-back runs at least this long get a break suggestion.
pub const BREAK_AFTER_RUN_MINUTES: i64 = 180;
pub const BREAK_DURATION_MINUTES: i64 = 15;
pub const BREAK_CONFIDENCE: f64 = 0.7;
pub const BREAK_TIME_SAVED_MINUTES: i64 = 10;

pub const TRAVEL_BUFFER_CONFIDENCE: f64 = 0.75;
pub const TRAVEL_BUFFER_TIME_SAVED_MINUTES: i64 = 15;

pub const OPTIMAL_TIME_SAVED_MINUTES: i64 = 0;

/// Suggestion impact: (productivity gain, attendee satisfaction, schedule
/// efficiency).
pub type ImpactValues = (f64, f64, f64);

pub const IMPACT_OPTIMAL_TIME: ImpactValues = (0.7, 0.8, 0.7);
pub const IMPACT_RESCHEDULE: ImpactValues = (0.5, 0.6, 0.7);
pub const IMPACT_CONSOLIDATE: ImpactValues = (0.6, 0.5, 0.8);
pub const IMPACT_FOCUS_TIME: ImpactValues = (0.9, 0.5, 0.6);
pub const IMPACT_BREAK_TIME: ImpactValues = (0.6, 0.7, 0.4);
pub const IMPACT_TRAVEL_BUFFER: ImpactValues = (0.4, 0.8, 0.5);
