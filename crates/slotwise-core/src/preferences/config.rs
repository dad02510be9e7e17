//! TOML-backed preference configuration.
//!
//! Preferences are stored at `~/.config/slotwise/preferences.toml`:
//!
//! ```toml
//! time_zone = "Europe/Berlin"
//! working_hours = "09:00-17:00"
//! lunch_break = "12:00-13:00"   # or "none"
//! buffer_between_meetings_minutes = 15
//!
//! [[preferred_times]]
//! start = 9
//! end = 11
//!
//! [[focus_blocks]]
//! window = "13:00-15:00"
//! priority = "high"
//!
//! [productivity]
//! morning_person = true
//! ```
//!
//! [`PreferencesConfig`] is the raw on-disk shape. Converting it into
//! [`SchedulingPreferences`] validates every field.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DailyWindow, FocusBlock, FocusPriority, HourRange, ProductivityProfile, SchedulingPreferences};
use crate::error::{ConfigError, CoreError, PreferencesError};

/// Value of `lunch_break` that disables the lunch window.
pub(crate) const NO_LUNCH_BREAK: &str = "none";

const MAX_BUFFER_MINUTES: i64 = 240;
const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Whole-hour range as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRangeConfig {
    pub start: u32,
    pub end: u32,
}

/// Focus block as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusBlockConfig {
    /// `HH:MM-HH:MM`
    pub window: String,
    #[serde(default)]
    pub priority: FocusPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Raw preference configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_working_hours")]
    pub working_hours: String,
    #[serde(default = "default_lunch_break")]
    pub lunch_break: String,
    #[serde(default = "default_max_meetings_per_day")]
    pub max_meetings_per_day: u32,
    #[serde(default = "default_preferred_duration")]
    pub preferred_duration_minutes: i64,
    #[serde(default = "default_buffer")]
    pub buffer_between_meetings_minutes: i64,
    #[serde(default = "default_preferred_times")]
    pub preferred_times: Vec<HourRangeConfig>,
    #[serde(default = "default_avoid_times")]
    pub avoid_times: Vec<HourRangeConfig>,
    #[serde(default)]
    pub focus_blocks: Vec<FocusBlockConfig>,
    #[serde(default)]
    pub productivity: ProductivityProfile,
}

// Default functions
fn default_time_zone() -> String {
    "UTC".into()
}
fn default_working_hours() -> String {
    "09:00-17:00".into()
}
fn default_lunch_break() -> String {
    "12:00-13:00".into()
}
fn default_max_meetings_per_day() -> u32 {
    6
}
fn default_preferred_duration() -> i64 {
    30
}
fn default_buffer() -> i64 {
    15
}
fn default_preferred_times() -> Vec<HourRangeConfig> {
    vec![
        HourRangeConfig { start: 9, end: 11 },
        HourRangeConfig { start: 14, end: 16 },
    ]
}
fn default_avoid_times() -> Vec<HourRangeConfig> {
    vec![HourRangeConfig { start: 12, end: 13 }]
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            working_hours: default_working_hours(),
            lunch_break: default_lunch_break(),
            max_meetings_per_day: default_max_meetings_per_day(),
            preferred_duration_minutes: default_preferred_duration(),
            buffer_between_meetings_minutes: default_buffer(),
            preferred_times: default_preferred_times(),
            avoid_times: default_avoid_times(),
            focus_blocks: Vec::new(),
            productivity: ProductivityProfile::default(),
        }
    }
}

fn hour_ranges(field: &str, ranges: &[HourRangeConfig]) -> Result<Vec<HourRange>, PreferencesError> {
    ranges
        .iter()
        .map(|r| HourRange::checked(field, r.start, r.end))
        .collect()
}

impl TryFrom<PreferencesConfig> for SchedulingPreferences {
    type Error = PreferencesError;

    fn try_from(config: PreferencesConfig) -> Result<Self, Self::Error> {
        let time_zone: Tz = config
            .time_zone
            .parse()
            .map_err(|_| PreferencesError::UnknownTimeZone(config.time_zone.clone()))?;

        if config.max_meetings_per_day == 0 {
            return Err(PreferencesError::InvalidValue {
                field: "max_meetings_per_day".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(1..=MAX_DURATION_MINUTES).contains(&config.preferred_duration_minutes) {
            return Err(PreferencesError::InvalidValue {
                field: "preferred_duration_minutes".into(),
                message: format!(
                    "must be in 1..={MAX_DURATION_MINUTES}, got {}",
                    config.preferred_duration_minutes
                ),
            });
        }
        if !(0..=MAX_BUFFER_MINUTES).contains(&config.buffer_between_meetings_minutes) {
            return Err(PreferencesError::InvalidValue {
                field: "buffer_between_meetings_minutes".into(),
                message: format!(
                    "must be in 0..={MAX_BUFFER_MINUTES}, got {}",
                    config.buffer_between_meetings_minutes
                ),
            });
        }

        let lunch = config.lunch_break.trim();
        let lunch_break = if lunch.is_empty() || lunch.eq_ignore_ascii_case(NO_LUNCH_BREAK) {
            None
        } else {
            Some(DailyWindow::parse("lunch_break", lunch)?)
        };

        let focus_blocks = config
            .focus_blocks
            .iter()
            .map(|block| {
                Ok(FocusBlock {
                    window: DailyWindow::parse("focus_blocks", &block.window)?,
                    priority: block.priority,
                    label: block.label.clone(),
                })
            })
            .collect::<Result<Vec<_>, PreferencesError>>()?;

        Ok(Self {
            preferred_times: hour_ranges("preferred_times", &config.preferred_times)?,
            avoid_times: hour_ranges("avoid_times", &config.avoid_times)?,
            max_meetings_per_day: config.max_meetings_per_day,
            preferred_duration_minutes: config.preferred_duration_minutes,
            buffer_between_meetings_minutes: config.buffer_between_meetings_minutes,
            lunch_break,
            working_hours: DailyWindow::parse("working_hours", &config.working_hours)?,
            time_zone,
            focus_blocks,
            productivity: config.productivity,
        })
    }
}

impl From<SchedulingPreferences> for PreferencesConfig {
    fn from(prefs: SchedulingPreferences) -> Self {
        let ranges = |ranges: &[HourRange]| {
            ranges
                .iter()
                .map(|r| HourRangeConfig {
                    start: r.start(),
                    end: r.end(),
                })
                .collect()
        };

        Self {
            time_zone: prefs.time_zone.name().to_string(),
            working_hours: prefs.working_hours.to_string(),
            lunch_break: prefs
                .lunch_break
                .map(|w| w.to_string())
                .unwrap_or_else(|| NO_LUNCH_BREAK.to_string()),
            max_meetings_per_day: prefs.max_meetings_per_day,
            preferred_duration_minutes: prefs.preferred_duration_minutes,
            buffer_between_meetings_minutes: prefs.buffer_between_meetings_minutes,
            preferred_times: ranges(&prefs.preferred_times),
            avoid_times: ranges(&prefs.avoid_times),
            focus_blocks: prefs
                .focus_blocks
                .iter()
                .map(|block| FocusBlockConfig {
                    window: block.window.to_string(),
                    priority: block.priority,
                    label: block.label.clone(),
                })
                .collect(),
            productivity: prefs.productivity,
        }
    }
}

/// Returns `~/.config/slotwise[-dev]/` based on SLOTWISE_ENV.
///
/// Set SLOTWISE_ENV=dev to use the development configuration directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or_else(|| ConfigError::DirectoryUnavailable("home directory not found".into()))?
        .join(".config");

    let env = std::env::var("SLOTWISE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("slotwise-dev")
    } else {
        base_dir.join("slotwise")
    };
    Ok(dir)
}

/// Default location of the preferences file.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("preferences.toml"))
}

impl SchedulingPreferences {
    /// Parse and validate preferences from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let config: PreferencesConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(Self::try_from(config)?)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&PreferencesConfig::from(self.clone()))
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Load preferences from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds values that fail validation.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loading scheduling preferences");
        Self::from_toml_str(&content)
    }

    /// Load from `path`, or return the defaults when the file does not exist.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "no preferences file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Persist to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }
}
