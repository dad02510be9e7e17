//! # Slotwise Core Library
//!
//! This library provides the scheduling and layout logic behind a calendar:
//! laying out overlapping events side by side, detecting conflicts, scoring
//! and searching meeting slots, and generating higher-level suggestions.
//! Everything here is pure and synchronous over caller-owned snapshots; the
//! `slotwise` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Rendering path**: events -> [`layout_span`] / [`LaneAssigner`] for lane
//!   maps, [`ConflictDetector::detect_all`] for inline warnings
//! - **Assistant path**: events + preferences -> [`SlotSearch`] ->
//!   [`SlotScorer`] -> [`SuggestionGenerator`]
//! - **Configuration**: TOML-backed [`SchedulingPreferences`]
//!
//! ## Key Components
//!
//! - [`Interval`]: Half-open time range shared by every component
//! - [`ConflictDetector`]: Classified conflicts for a candidate interval
//! - [`LaneAssigner`]: Minimal, deterministic lane assignment
//! - [`SlotScorer`]: Weighted score over six considerations
//! - [`SlotSearch`]: Ranked candidate slots over a range
//! - [`SuggestionGenerator`]: Typed scheduling suggestions
//!
//! All heuristic numbers live in [`tuning`].

pub mod conflict;
pub mod error;
pub mod event;
pub mod interval;
pub mod layout;
pub mod preferences;
pub mod scoring;
pub mod search;
pub mod suggestions;
pub mod tuning;

pub use conflict::{ConflictDescriptor, ConflictDetector, ConflictKind, ConflictSeverity};
pub use error::{ConfigError, CoreError, IntervalError, PreferencesError, Result};
pub use event::{AttendeeId, CalendarEvent, EventCategory, EventId};
pub use interval::Interval;
pub use layout::{layout_span, max_overlap, normalize_to_span, LaneAssigner, LaneAssignment};
pub use preferences::{
    DailyWindow, FocusBlock, FocusPriority, HourRange, PreferencesBuilder, ProductivityProfile,
    SchedulingPreferences,
};
pub use scoring::{Consideration, ConsiderationTerm, SlotScorer, TimeSlot};
pub use search::{SearchConfig, SlotSearch};
pub use suggestions::{ActionRequired, Impact, Suggestion, SuggestionGenerator, SuggestionType};
