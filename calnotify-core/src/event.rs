//! Provider-neutral event types.
//!
//! Providers convert their API records into these types. The engine only
//! interprets identity, summary, start, reminders and series membership;
//! everything else rides along in `provider_data` so a full-replace update
//! can send the record back intact.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event as returned by a `Calendar` listing or fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Opaque provider id. Absent ids mark a data-integrity problem upstream.
    pub id: Option<String>,
    pub summary: Option<String>,
    pub start: Option<EventStart>,
    /// `None` when the provider sent no reminder block at all
    pub reminders: Option<ReminderSet>,
    /// Series master id, present only on occurrences of a recurring series
    pub recurring_event_id: Option<String>,

    /// Raw provider record, preserved for round-tripping back to the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_data: Option<serde_json::Value>,
}

/// When an event starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStart {
    /// All-day event
    Date(NaiveDate),
    DateTime {
        date_time: DateTime<Utc>,
        /// IANA zone name as reported by the provider (may be empty)
        #[serde(default)]
        time_zone: String,
    },
}

impl EventStart {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventStart::Date(_))
    }
}

impl fmt::Display for EventStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStart::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventStart::DateTime { date_time, time_zone } if time_zone.is_empty() => {
                write!(f, "{}", date_time.format("%Y-%m-%d %H:%M UTC"))
            }
            EventStart::DateTime { date_time, time_zone } => {
                write!(f, "{} ({})", date_time.format("%Y-%m-%d %H:%M UTC"), time_zone)
            }
        }
    }
}

/// An event's reminder configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderSet {
    /// Whether the calendar's default reminders apply
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl ReminderSet {
    /// Override offsets with duplicates collapsed.
    pub fn override_minutes(&self) -> BTreeSet<i64> {
        self.overrides.iter().map(|r| r.minutes).collect()
    }
}

/// One reminder, superseding the calendar defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderOverride {
    /// Minutes before the event start
    pub minutes: i64,
    pub method: ReminderMethod,
}

/// How a reminder is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Popup,
    Email,
    #[serde(untagged)]
    Other(String),
}

impl ReminderMethod {
    pub fn as_str(&self) -> &str {
        match self {
            ReminderMethod::Popup => "popup",
            ReminderMethod::Email => "email",
            ReminderMethod::Other(s) => s,
        }
    }
}

impl From<&str> for ReminderMethod {
    fn from(s: &str) -> Self {
        match s {
            "popup" => ReminderMethod::Popup,
            "email" => ReminderMethod::Email,
            other => ReminderMethod::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ReminderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CalendarEvent {
    /// Summary for display, with a placeholder for untitled events.
    pub fn title(&self) -> &str {
        match self.summary.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "(No title)",
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
