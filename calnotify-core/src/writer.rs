//! Writes the reminder policy onto a target event.

use log::{info, warn};

use crate::calendar::Calendar;
use crate::error::CalNotifyError;
use crate::event::CalendarEvent;
use crate::policy::ReminderPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// Written, or would have been in a dry run
    Success,
    Failure(String),
}

/// Replace `target`'s reminders with the policy and submit it.
///
/// In a dry run nothing is sent and the write reports success, so dry and
/// live runs tally the same. A target without an id fails in both modes.
/// Errors come back as `Failure`; there are no retries.
pub async fn apply<C: Calendar>(
    calendar: &C,
    calendar_id: &str,
    target: &mut CalendarEvent,
    context: Option<&str>,
    policy: &ReminderPolicy,
    dry_run: bool,
) -> WriteResult {
    target.reminders = Some(policy.reminder_set());

    let label = context.map(|c| format!(" ({c})")).unwrap_or_default();

    let Some(event_id) = target.id.clone() else {
        warn!("Cannot update '{}'{}: no event id", target.title(), label);
        return WriteResult::Failure(CalNotifyError::MissingEventId.to_string());
    };

    if dry_run {
        info!("[dry run] Would update '{}'{}", target.title(), label);
        return WriteResult::Success;
    }

    match calendar.update_event(calendar_id, &event_id, target).await {
        Ok(()) => {
            info!("Updated '{}'{}", target.title(), label);
            WriteResult::Success
        }
        Err(e) => {
            warn!("Failed to update '{}'{}: {}", target.title(), label, e);
            WriteResult::Failure(e.to_string())
        }
    }
}
