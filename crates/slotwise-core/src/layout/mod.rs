//! Lane layout for overlapping events.
//!
//! The rendering path: events of one visible span are normalized onto the
//! span ([`normalize_to_span`]) and then packed into the minimum number of
//! side-by-side lanes ([`LaneAssigner::assign`]).

mod lanes;
mod span;

pub use lanes::{assign, max_overlap, LaneAssigner, LaneAssignment};
pub use span::{layout_span, normalize_to_span};
