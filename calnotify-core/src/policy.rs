//! The reminder policy the updater enforces, and the rules for leaving events alone.

use std::collections::BTreeSet;

use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::{ReminderMethod, ReminderOverride, ReminderSet};

const DEFAULT_MINUTES: [i64; 2] = [2, 5];
const DEFAULT_SKIP_MARKER: &str = "OOO";

/// Desired reminders: a set of minute offsets, all delivered the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderPolicy {
    minutes: BTreeSet<i64>,
    method: ReminderMethod,
}

impl Default for ReminderPolicy {
    /// Two popups, 2 and 5 minutes before start
    fn default() -> Self {
        ReminderPolicy {
            minutes: DEFAULT_MINUTES.into_iter().collect(),
            method: ReminderMethod::Popup,
        }
    }
}

impl ReminderPolicy {
    pub fn new(
        minutes: impl IntoIterator<Item = i64>,
        method: ReminderMethod,
    ) -> CalNotifyResult<Self> {
        let minutes: BTreeSet<i64> = minutes.into_iter().collect();

        if minutes.is_empty() {
            return Err(CalNotifyError::Config(
                "Reminder policy needs at least one offset".into(),
            ));
        }
        if let Some(m) = minutes.iter().find(|m| **m < 0) {
            return Err(CalNotifyError::Config(format!(
                "Reminder offset must not be negative (got {m})"
            )));
        }

        Ok(ReminderPolicy { minutes, method })
    }

    pub fn minutes(&self) -> &BTreeSet<i64> {
        &self.minutes
    }

    pub fn method(&self) -> &ReminderMethod {
        &self.method
    }

    /// Whether `reminders` already carries every desired offset.
    ///
    /// Subset test: extra offsets on the event do not matter, and neither does
    /// the delivery method.
    pub fn is_satisfied_by(&self, reminders: Option<&ReminderSet>) -> bool {
        let present = reminders.map(ReminderSet::override_minutes).unwrap_or_default();
        self.minutes.is_subset(&present)
    }

    /// The reminder set written onto updated events. Replaces, never merges.
    pub fn reminder_set(&self) -> ReminderSet {
        ReminderSet {
            use_default: false,
            overrides: self
                .minutes
                .iter()
                .map(|&minutes| ReminderOverride {
                    minutes,
                    method: self.method.clone(),
                })
                .collect(),
        }
    }
}

/// Everything the classifier needs besides the event itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipRules {
    pub policy: ReminderPolicy,
    /// Case-sensitive substring marking an event as out-of-office
    pub skip_marker: String,
}

impl Default for SkipRules {
    fn default() -> Self {
        SkipRules {
            policy: ReminderPolicy::default(),
            skip_marker: DEFAULT_SKIP_MARKER.to_string(),
        }
    }
}
