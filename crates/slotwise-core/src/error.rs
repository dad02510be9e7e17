//! Core error types for slotwise-core.
//!
//! Validation failures are raised where values are constructed (intervals,
//! preferences) and never caught inside the library. "Nothing found" outcomes
//! such as an empty slot search are plain empty results, not errors.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core error type for slotwise-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed interval
    #[error("Invalid interval: {0}")]
    Interval(#[from] IntervalError),

    /// Scheduling preferences failed validation
    #[error("Invalid preferences: {0}")]
    Preferences(#[from] PreferencesError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Interval construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// `start` is later than `end`
    #[error("start ({start}) must not be later than end ({end})")]
    StartAfterEnd {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Adding a duration to an instant left the representable range
    #[error("duration of {minutes} minutes from {start} is out of range")]
    OutOfRange { start: DateTime<Utc>, minutes: i64 },
}

/// Preference validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferencesError {
    /// Hour range with start >= end or hours beyond 24
    #[error("Invalid hour range for '{field}': {start}..{end} (expected 0 <= start < end <= 24)")]
    InvalidHourRange { field: String, start: u32, end: u32 },

    /// Time-of-day window with start >= end
    #[error("Invalid time window for '{field}': {start} must be earlier than {end}")]
    InvalidWindow {
        field: String,
        start: String,
        end: String,
    },

    /// Time of day not in HH:MM form
    #[error("Invalid time of day for '{field}': '{value}' (expected HH:MM)")]
    InvalidTimeOfDay { field: String, value: String },

    /// Unknown IANA time zone name
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// Numeric value out of its allowed range
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to resolve or create the configuration directory
    #[error("Failed to resolve configuration directory: {0}")]
    DirectoryUnavailable(String),

    /// Failed to read the configuration file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to write the configuration file
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// File was read but is not valid TOML for preferences
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn interval_error_message_names_both_instants() {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let err = IntervalError::StartAfterEnd { start, end };
        let msg = err.to_string();
        assert!(msg.contains("2025-03-03 10:00:00 UTC"));
        assert!(msg.contains("2025-03-03 09:00:00 UTC"));
    }

    #[test]
    fn core_error_wraps_domain_errors() {
        let err: CoreError = PreferencesError::UnknownTimeZone("Mars/Olympus".into()).into();
        assert!(matches!(err, CoreError::Preferences(_)));
        assert_eq!(
            err.to_string(),
            "Invalid preferences: Unknown time zone: Mars/Olympus"
        );
    }
}
