//! Decides, per event, whether its reminders need normalizing.

use std::fmt;

use serde::Serialize;

use crate::event::CalendarEvent;
use crate::policy::SkipRules;

/// Why an event was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    AllDay,
    OutOfOffice,
    AlreadyConfigured,
    /// Another instance of the same series already updated its master
    DeferredToMaster,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::AllDay => "all-day",
            SkipReason::OutOfOffice => "out-of-office",
            SkipReason::AlreadyConfigured => "already-configured",
            SkipReason::DeferredToMaster => "recurring-instance-deferred-to-master",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Diagnostics for an event the provider handed over in an unusable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidEvent {
    pub summary: Option<String>,
    pub id: Option<String>,
    pub reason: String,
    /// Debug dump of the start descriptor as received
    pub start_dump: String,
}

impl InvalidEvent {
    fn missing_event() -> Self {
        InvalidEvent {
            summary: None,
            id: None,
            reason: "event is missing".to_string(),
            start_dump: "None".to_string(),
        }
    }

    fn missing_start(event: &CalendarEvent) -> Self {
        InvalidEvent {
            summary: event.summary.clone(),
            id: event.id.clone(),
            reason: "event has no start time".to_string(),
            start_dump: format!("{:?}", event.start),
        }
    }
}

/// Outcome of classifying one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Eligible,
    Skip(SkipReason),
    Invalid(InvalidEvent),
}

/// Classify an event. First matching rule wins:
/// invalid, all-day, out-of-office marker, already configured, eligible.
pub fn classify(event: Option<&CalendarEvent>, rules: &SkipRules) -> Verdict {
    let Some(event) = event else {
        return Verdict::Invalid(InvalidEvent::missing_event());
    };

    let Some(start) = &event.start else {
        return Verdict::Invalid(InvalidEvent::missing_start(event));
    };

    if start.is_all_day() {
        return Verdict::Skip(SkipReason::AllDay);
    }

    let summary = event.summary.as_deref().unwrap_or_default();
    if !rules.skip_marker.is_empty() && summary.contains(rules.skip_marker.as_str()) {
        return Verdict::Skip(SkipReason::OutOfOffice);
    }

    if rules.policy.is_satisfied_by(event.reminders.as_ref()) {
        return Verdict::Skip(SkipReason::AlreadyConfigured);
    }

    Verdict::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventStart, ReminderMethod, ReminderOverride, ReminderSet};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_test_event() -> CalendarEvent {
        CalendarEvent {
            id: Some("e1".to_string()),
            summary: Some("Standup".to_string()),
            start: Some(EventStart::DateTime {
                date_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
                time_zone: "UTC".to_string(),
            }),
            reminders: None,
            recurring_event_id: None,
            provider_data: None,
        }
    }

    fn all_day() -> Option<EventStart> {
        Some(EventStart::Date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()))
    }

    fn with_minutes(minutes: &[i64]) -> Option<ReminderSet> {
        Some(ReminderSet {
            use_default: false,
            overrides: minutes
                .iter()
                .map(|&minutes| ReminderOverride {
                    minutes,
                    method: ReminderMethod::Popup,
                })
                .collect(),
        })
    }

    #[test]
    fn test_timed_event_without_reminders_is_eligible() {
        let event = make_test_event();
        assert_eq!(classify(Some(&event), &SkipRules::default()), Verdict::Eligible);
    }

    #[test]
    fn test_missing_event_is_invalid() {
        match classify(None, &SkipRules::default()) {
            Verdict::Invalid(invalid) => {
                assert_eq!(invalid.id, None);
                assert_eq!(invalid.summary, None);
                assert_eq!(invalid.start_dump, "None");
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_start_is_invalid_with_diagnostics() {
        let mut event = make_test_event();
        event.id = None;
        event.start = None;

        match classify(Some(&event), &SkipRules::default()) {
            Verdict::Invalid(invalid) => {
                assert_eq!(invalid.summary.as_deref(), Some("Standup"));
                assert_eq!(invalid.id, None);
                assert_eq!(invalid.reason, "event has no start time");
                assert_eq!(invalid.start_dump, "None");
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_all_day_wins_over_everything_else() {
        let mut event = make_test_event();
        event.start = all_day();
        assert_eq!(
            classify(Some(&event), &SkipRules::default()),
            Verdict::Skip(SkipReason::AllDay)
        );

        event.summary = Some("OOO - PTO".to_string());
        event.reminders = with_minutes(&[2, 5]);
        assert_eq!(
            classify(Some(&event), &SkipRules::default()),
            Verdict::Skip(SkipReason::AllDay)
        );
    }

    #[test]
    fn test_ooo_marker_is_case_sensitive_substring() {
        let mut event = make_test_event();
        event.summary = Some("OOO - PTO".to_string());
        assert_eq!(
            classify(Some(&event), &SkipRules::default()),
            Verdict::Skip(SkipReason::OutOfOffice)
        );

        event.summary = Some("Zoom with Tool OOO Team".to_string());
        assert_eq!(
            classify(Some(&event), &SkipRules::default()),
            Verdict::Skip(SkipReason::OutOfOffice)
        );

        event.summary = Some("ooo - lowercase".to_string());
        assert_eq!(classify(Some(&event), &SkipRules::default()), Verdict::Eligible);
    }

    #[test]
    fn test_ooo_wins_over_already_configured() {
        let mut event = make_test_event();
        event.summary = Some("Team OOO".to_string());
        event.reminders = with_minutes(&[2, 5]);
        assert_eq!(
            classify(Some(&event), &SkipRules::default()),
            Verdict::Skip(SkipReason::OutOfOffice)
        );
    }

    #[test]
    fn test_subset_law() {
        let mut event = make_test_event();
        event.reminders = with_minutes(&[2, 5, 10]);
        assert_eq!(
            classify(Some(&event), &SkipRules::default()),
            Verdict::Skip(SkipReason::AlreadyConfigured)
        );

        event.reminders = with_minutes(&[2]);
        assert_eq!(classify(Some(&event), &SkipRules::default()), Verdict::Eligible);
    }

    #[test]
    fn test_missing_summary_is_not_out_of_office() {
        let mut event = make_test_event();
        event.summary = None;
        assert_eq!(classify(Some(&event), &SkipRules::default()), Verdict::Eligible);
    }

    #[test]
    fn test_custom_marker() {
        let rules = SkipRules {
            skip_marker: "[no-remind]".to_string(),
            ..SkipRules::default()
        };
        let mut event = make_test_event();
        event.summary = Some("Focus [no-remind]".to_string());
        assert_eq!(
            classify(Some(&event), &rules),
            Verdict::Skip(SkipReason::OutOfOffice)
        );

        event.summary = Some("OOO".to_string());
        assert_eq!(classify(Some(&event), &rules), Verdict::Eligible);
    }
}
