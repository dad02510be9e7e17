//! Scheduling preferences.
//!
//! [`SchedulingPreferences`] is an immutable, validated value object built once
//! per request, either through [`PreferencesBuilder`] or by loading a TOML
//! file (see [`config`]). Both paths run the same validation, so scoring code
//! never has to second-guess a preference value.
//!
//! All time-of-day values are interpreted in the preferences' IANA time zone.

mod config;

pub use config::{
    data_dir, default_path, FocusBlockConfig, HourRangeConfig, PreferencesConfig,
};

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::PreferencesError;
use crate::interval::Interval;
use crate::tuning;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Whole-hour range `[start, end)` in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    start: u32,
    end: u32,
}

impl HourRange {
    /// Create a range, requiring `0 <= start < end <= 24`.
    pub fn new(start: u32, end: u32) -> Result<Self, PreferencesError> {
        Self::checked("hour_range", start, end)
    }

    pub(crate) fn checked(field: &str, start: u32, end: u32) -> Result<Self, PreferencesError> {
        if start >= end || end > 24 {
            return Err(PreferencesError::InvalidHourRange {
                field: field.to_string(),
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.start <= hour && hour < self.end
    }
}

/// A recurring time-of-day window `[start, end)`, stored as minutes since
/// local midnight. `end` may be `24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    start_minute: u32,
    end_minute: u32,
}

impl DailyWindow {
    /// Create a window from minutes since midnight.
    pub fn new(start_minute: u32, end_minute: u32) -> Result<Self, PreferencesError> {
        if start_minute >= end_minute || end_minute > MINUTES_PER_DAY {
            return Err(PreferencesError::InvalidWindow {
                field: "window".to_string(),
                start: format_minutes(start_minute),
                end: format_minutes(end_minute),
            });
        }
        Ok(Self {
            start_minute,
            end_minute,
        })
    }

    /// Parse `HH:MM-HH:MM`.
    pub fn parse(field: &str, value: &str) -> Result<Self, PreferencesError> {
        let Some((start, end)) = value.split_once('-') else {
            return Err(PreferencesError::InvalidTimeOfDay {
                field: field.to_string(),
                value: value.to_string(),
            });
        };
        let start_minute = parse_time_to_minutes(field, start.trim())?;
        let end_minute = parse_time_to_minutes(field, end.trim())?;
        if start_minute >= end_minute {
            return Err(PreferencesError::InvalidWindow {
                field: field.to_string(),
                start: start.trim().to_string(),
                end: end.trim().to_string(),
            });
        }
        Ok(Self {
            start_minute,
            end_minute,
        })
    }

    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    pub fn end_minute(&self) -> u32 {
        self.end_minute
    }

    /// The window on a specific local date, as an absolute interval.
    ///
    /// Returns `None` when a boundary falls into a DST gap.
    pub fn on_date(&self, date: NaiveDate, tz: Tz) -> Option<Interval> {
        let start = local_instant(date, self.start_minute, tz)?;
        let end = local_instant(date, self.end_minute, tz)?;
        Interval::new(start, end).ok()
    }

    /// Check if the window overlaps `candidate` on any local date it touches.
    pub fn overlaps(&self, candidate: &Interval, tz: Tz) -> bool {
        let first = candidate.start().with_timezone(&tz).date_naive();
        let last = candidate.end().with_timezone(&tz).date_naive();

        let mut date = first;
        while date <= last {
            if let Some(window) = self.on_date(date, tz) {
                if window.overlaps(candidate) {
                    return true;
                }
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        false
    }

    /// Check if `candidate` lies entirely inside the window of its start date.
    pub fn contains(&self, candidate: &Interval, tz: Tz) -> bool {
        let date = candidate.start().with_timezone(&tz).date_naive();
        self.on_date(date, tz)
            .map(|window| window.contains(candidate))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for DailyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            format_minutes(self.start_minute),
            format_minutes(self.end_minute)
        )
    }
}

/// Priority of a focus-time block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FocusPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A protected focus-time block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusBlock {
    pub window: DailyWindow,
    pub priority: FocusPriority,
    pub label: Option<String>,
}

/// When during the day the user does their best work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivityProfile {
    #[serde(default)]
    pub morning_person: bool,
    #[serde(default)]
    pub afternoon_person: bool,
    #[serde(default)]
    pub evening_person: bool,
}

impl Default for ProductivityProfile {
    fn default() -> Self {
        Self {
            morning_person: true,
            afternoon_person: false,
            evening_person: false,
        }
    }
}

impl ProductivityProfile {
    /// Whether a local hour falls into one of the profile's peak periods.
    pub fn matches_hour(&self, hour: u32) -> bool {
        let within = |(start, end): (u32, u32)| start <= hour && hour < end;
        (self.morning_person && within(tuning::MORNING_HOURS))
            || (self.afternoon_person && within(tuning::AFTERNOON_HOURS))
            || (self.evening_person && within(tuning::EVENING_HOURS))
    }
}

/// Validated scheduling preferences.
///
/// Serialized through [`PreferencesConfig`], so deserializing runs the same
/// validation as [`PreferencesBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PreferencesConfig", into = "PreferencesConfig")]
pub struct SchedulingPreferences {
    preferred_times: Vec<HourRange>,
    avoid_times: Vec<HourRange>,
    max_meetings_per_day: u32,
    preferred_duration_minutes: i64,
    buffer_between_meetings_minutes: i64,
    lunch_break: Option<DailyWindow>,
    working_hours: DailyWindow,
    time_zone: Tz,
    focus_blocks: Vec<FocusBlock>,
    productivity: ProductivityProfile,
}

impl Default for SchedulingPreferences {
    fn default() -> Self {
        Self {
            preferred_times: vec![HourRange { start: 9, end: 11 }, HourRange { start: 14, end: 16 }],
            avoid_times: vec![HourRange { start: 12, end: 13 }],
            max_meetings_per_day: 6,
            preferred_duration_minutes: 30,
            buffer_between_meetings_minutes: 15,
            lunch_break: Some(DailyWindow {
                start_minute: 12 * 60,
                end_minute: 13 * 60,
            }),
            working_hours: DailyWindow {
                start_minute: 9 * 60,
                end_minute: 17 * 60,
            },
            time_zone: Tz::UTC,
            focus_blocks: Vec::new(),
            productivity: ProductivityProfile::default(),
        }
    }
}

impl SchedulingPreferences {
    /// Start building preferences from the documented defaults.
    pub fn builder() -> PreferencesBuilder {
        PreferencesBuilder::new()
    }

    pub fn preferred_times(&self) -> &[HourRange] {
        &self.preferred_times
    }

    pub fn avoid_times(&self) -> &[HourRange] {
        &self.avoid_times
    }

    pub fn max_meetings_per_day(&self) -> u32 {
        self.max_meetings_per_day
    }

    pub fn preferred_duration_minutes(&self) -> i64 {
        self.preferred_duration_minutes
    }

    pub fn buffer_between_meetings_minutes(&self) -> i64 {
        self.buffer_between_meetings_minutes
    }

    pub fn lunch_break(&self) -> Option<&DailyWindow> {
        self.lunch_break.as_ref()
    }

    pub fn working_hours(&self) -> &DailyWindow {
        &self.working_hours
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn focus_blocks(&self) -> &[FocusBlock] {
        &self.focus_blocks
    }

    pub fn productivity(&self) -> &ProductivityProfile {
        &self.productivity
    }

    /// Hour of day of `instant` in the preferences' time zone.
    pub fn local_hour(&self, instant: DateTime<Utc>) -> u32 {
        instant.with_timezone(&self.time_zone).hour()
    }

    /// Calendar date of `instant` in the preferences' time zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }

    pub fn is_preferred_hour(&self, hour: u32) -> bool {
        self.preferred_times.iter().any(|r| r.contains_hour(hour))
    }

    pub fn is_avoided_hour(&self, hour: u32) -> bool {
        self.avoid_times.iter().any(|r| r.contains_hour(hour))
    }

    /// Check if `candidate` intersects the lunch window.
    pub fn overlaps_lunch(&self, candidate: &Interval) -> bool {
        self.lunch_break
            .map(|lunch| lunch.overlaps(candidate, self.time_zone))
            .unwrap_or(false)
    }

    /// Check if `candidate` intersects any high-priority focus block.
    pub fn overlaps_high_priority_focus(&self, candidate: &Interval) -> bool {
        self.focus_blocks
            .iter()
            .filter(|block| block.priority == FocusPriority::High)
            .any(|block| block.window.overlaps(candidate, self.time_zone))
    }

    /// Check if `candidate` lies inside the working hours of its local date.
    pub fn within_working_hours(&self, candidate: &Interval) -> bool {
        self.working_hours.contains(candidate, self.time_zone)
    }
}

/// Builder for [`SchedulingPreferences`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct PreferencesBuilder {
    config: PreferencesConfig,
}

impl PreferencesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preferred_times(mut self, ranges: &[(u32, u32)]) -> Self {
        self.config.preferred_times = ranges.iter().map(|&(start, end)| HourRangeConfig { start, end }).collect();
        self
    }

    pub fn avoid_times(mut self, ranges: &[(u32, u32)]) -> Self {
        self.config.avoid_times = ranges.iter().map(|&(start, end)| HourRangeConfig { start, end }).collect();
        self
    }

    pub fn max_meetings_per_day(mut self, max: u32) -> Self {
        self.config.max_meetings_per_day = max;
        self
    }

    pub fn preferred_duration_minutes(mut self, minutes: i64) -> Self {
        self.config.preferred_duration_minutes = minutes;
        self
    }

    pub fn buffer_between_meetings_minutes(mut self, minutes: i64) -> Self {
        self.config.buffer_between_meetings_minutes = minutes;
        self
    }

    /// Lunch window as `HH:MM-HH:MM`, or `None` for no lunch break.
    pub fn lunch_break(mut self, window: Option<&str>) -> Self {
        self.config.lunch_break = window.unwrap_or(config::NO_LUNCH_BREAK).to_string();
        self
    }

    /// Working hours as `HH:MM-HH:MM`.
    pub fn working_hours(mut self, window: &str) -> Self {
        self.config.working_hours = window.to_string();
        self
    }

    /// IANA time zone name, e.g. `Europe/Berlin`.
    pub fn time_zone(mut self, name: &str) -> Self {
        self.config.time_zone = name.to_string();
        self
    }

    pub fn focus_block(mut self, window: &str, priority: FocusPriority, label: Option<&str>) -> Self {
        self.config.focus_blocks.push(FocusBlockConfig {
            window: window.to_string(),
            priority,
            label: label.map(str::to_string),
        });
        self
    }

    pub fn productivity(mut self, profile: ProductivityProfile) -> Self {
        self.config.productivity = profile;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<SchedulingPreferences, PreferencesError> {
        SchedulingPreferences::try_from(self.config)
    }
}

/// Parse an `HH:MM` time of day into minutes since midnight. `24:00` is
/// accepted as the end of the day.
pub(crate) fn parse_time_to_minutes(field: &str, value: &str) -> Result<u32, PreferencesError> {
    let invalid = || PreferencesError::InvalidTimeOfDay {
        field: field.to_string(),
        value: value.to_string(),
    };

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    if minutes > 59 || hours > 24 || (hours == 24 && minutes != 0) {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn local_instant(date: NaiveDate, minute_of_day: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let day = if minute_of_day >= MINUTES_PER_DAY {
        date.succ_opt()?
    } else {
        date
    };
    let minute = minute_of_day % MINUTES_PER_DAY;
    let naive = day.and_hms_opt(minute / 60, minute % 60, 0)?;
    let local = tz.from_local_datetime(&naive);
    local
        .earliest()
        .or_else(|| local.latest())
        .map(|dt| dt.with_timezone(&Utc))
}
