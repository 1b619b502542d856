//! The calendar collaborator the updater talks to, and the window it scans.

use chrono::{DateTime, Months, Utc};

use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::CalendarEvent;

/// Half-open time range `[from, to)` to list events in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// `now` through `now` plus the given number of calendar months.
    pub fn months_ahead(now: DateTime<Utc>, months: u32) -> CalNotifyResult<Self> {
        let to = now.checked_add_months(Months::new(months)).ok_or_else(|| {
            CalNotifyError::Config(format!("Window of {months} months is out of range"))
        })?;

        Ok(TimeWindow { from: now, to })
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}

/// A remote calendar.
///
/// Every call is a single round trip; timeouts and retries are the
/// implementation's business.
#[allow(async_fn_in_trait)]
pub trait Calendar {
    /// List events in `window`.
    ///
    /// With `expand_recurring`, recurring series come back as individual
    /// occurrences. Without it, each series appears once (its master).
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        expand_recurring: bool,
    ) -> CalNotifyResult<Vec<CalendarEvent>>;

    /// Fetch one event by id. Used to load series masters.
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> CalNotifyResult<CalendarEvent>;

    /// Replace an event with `event` (full-record semantics).
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> CalNotifyResult<()>;
}
