pub mod conflicts;
pub mod layout;
pub mod prefs;
pub mod search;
pub mod suggest;

use std::error::Error;
use std::io::Read;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use slotwise_core::preferences::default_path;
use slotwise_core::{CalendarEvent, Interval, SchedulingPreferences};
use tracing::debug;

/// Options shared by every subcommand.
pub struct Context {
    pub prefs_path: Option<PathBuf>,
    pub events_path: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    /// Preferences file in effect: `--prefs` or the default location.
    pub fn prefs_file(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.prefs_path {
            Some(path) => Ok(path.clone()),
            None => Ok(default_path()?),
        }
    }

    /// Load preferences. An explicit `--prefs` file must exist; the default
    /// file falls back to built-in defaults when absent.
    pub fn load_prefs(&self) -> Result<SchedulingPreferences, Box<dyn Error>> {
        let prefs = match &self.prefs_path {
            Some(path) => SchedulingPreferences::load_from(path)?,
            None => SchedulingPreferences::load_or_default(&default_path()?)?,
        };
        Ok(prefs)
    }

    /// Read the event snapshot from `--events` or stdin.
    pub fn load_events(&self) -> Result<Vec<CalendarEvent>, Box<dyn Error>> {
        let content = match &self.events_path {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read events from {}: {e}", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let events: Vec<CalendarEvent> = serde_json::from_str(&content)?;
        debug!(count = events.len(), "events loaded");
        Ok(events)
    }

    /// Print `value` as pretty JSON when `--json` is set, else run `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> Result<(), Box<dyn Error>> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human();
        }
        Ok(())
    }
}

/// Build an interval from command-line bounds.
pub fn range(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Interval, Box<dyn Error>> {
    Ok(Interval::new(from, to)?)
}

/// Short human form of an interval: `2025-03-03 09:00 - 10:00`.
pub fn format_interval(interval: &Interval) -> String {
    let (start, end) = (interval.start(), interval.end());
    if start.date_naive() == end.date_naive() {
        format!("{} - {}", start.format("%Y-%m-%d %H:%M"), end.format("%H:%M"))
    } else {
        format!(
            "{} - {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        )
    }
}
