//! Conversions between Google Calendar API events and calnotify events.

use anyhow::{Context, Result};
use calnotify_core::{CalendarEvent, EventStart, ReminderMethod, ReminderOverride, ReminderSet};

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

pub trait ToGoogle {
    fn to_google(&self) -> Result<google_calendar::types::Event>;
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let provider_data =
            serde_json::to_value(&event).context("Failed to serialize Google event")?;

        let start = event.start.as_ref().and_then(|start| {
            if let Some(d) = start.date {
                Some(EventStart::Date(d))
            } else {
                start.date_time.map(|dt| EventStart::DateTime {
                    date_time: dt,
                    time_zone: start.time_zone.clone(),
                })
            }
        });

        let reminders = event.reminders.as_ref().map(|rem| ReminderSet {
            use_default: rem.use_default,
            overrides: rem
                .overrides
                .iter()
                .map(|r| ReminderOverride {
                    minutes: r.minutes,
                    method: ReminderMethod::from(r.method.as_str()),
                })
                .collect(),
        });

        Ok(CalendarEvent {
            id: non_empty(&event.id),
            summary: non_empty(&event.summary),
            start,
            reminders,
            recurring_event_id: non_empty(&event.recurring_event_id),
            provider_data: Some(provider_data),
        })
    }
}

impl ToGoogle for CalendarEvent {
    /// Rebuild the full Google record: start from the preserved raw event
    /// and lay the fields calnotify owns on top of it.
    fn to_google(&self) -> Result<google_calendar::types::Event> {
        let mut event: google_calendar::types::Event = match &self.provider_data {
            Some(raw) => serde_json::from_value(raw.clone())
                .context("Failed to restore Google event from provider data")?,
            None => google_calendar::types::Event::default(),
        };

        if let Some(id) = &self.id {
            event.id = id.clone();
        }
        if let Some(summary) = &self.summary {
            event.summary = summary.clone();
        }
        if let Some(start) = &self.start {
            event.start = Some(event_start_to_google(start));
        }
        event.recurring_event_id = self.recurring_event_id.clone().unwrap_or_default();
        event.reminders = self.reminders.as_ref().map(reminders_to_google);

        Ok(event)
    }
}

fn event_start_to_google(start: &EventStart) -> google_calendar::types::EventDateTime {
    match start {
        EventStart::Date(d) => google_calendar::types::EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: String::new(),
        },
        EventStart::DateTime {
            date_time,
            time_zone,
        } => google_calendar::types::EventDateTime {
            date: None,
            date_time: Some(*date_time),
            time_zone: time_zone.clone(),
        },
    }
}

fn reminders_to_google(reminders: &ReminderSet) -> google_calendar::types::Reminders {
    google_calendar::types::Reminders {
        overrides: reminders
            .overrides
            .iter()
            .map(|r| google_calendar::types::EventReminder {
                method: r.method.as_str().to_string(),
                minutes: r.minutes,
            })
            .collect(),
        use_default: reminders.use_default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calnotify_core::policy::ReminderPolicy;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_google_event() -> google_calendar::types::Event {
        google_calendar::types::Event {
            id: "e1".to_string(),
            summary: "Standup".to_string(),
            description: "Daily sync".to_string(),
            location: "Room 4".to_string(),
            start: Some(google_calendar::types::EventDateTime {
                date: None,
                date_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()),
                time_zone: "Europe/Berlin".to_string(),
            }),
            reminders: Some(google_calendar::types::Reminders {
                overrides: vec![google_calendar::types::EventReminder {
                    method: "email".to_string(),
                    minutes: 30,
                }],
                use_default: false,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_google_timed_event() {
        let event = CalendarEvent::from_google(make_google_event()).unwrap();

        assert_eq!(event.id.as_deref(), Some("e1"));
        assert_eq!(event.summary.as_deref(), Some("Standup"));
        assert_eq!(
            event.start,
            Some(EventStart::DateTime {
                date_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
                time_zone: "Europe/Berlin".to_string(),
            })
        );
        assert_eq!(
            event.reminders.unwrap().overrides,
            vec![ReminderOverride { minutes: 30, method: ReminderMethod::Email }]
        );
        assert_eq!(event.recurring_event_id, None);
    }

    #[test]
    fn test_from_google_blank_fields_become_none() {
        let google = google_calendar::types::Event {
            recurring_event_id: "master".to_string(),
            ..Default::default()
        };
        let event = CalendarEvent::from_google(google).unwrap();

        assert_eq!(event.id, None);
        assert_eq!(event.summary, None);
        assert_eq!(event.start, None);
        assert_eq!(event.reminders, None);
        assert_eq!(event.recurring_event_id.as_deref(), Some("master"));
    }

    #[test]
    fn test_from_google_all_day() {
        let google = google_calendar::types::Event {
            start: Some(google_calendar::types::EventDateTime {
                date: Some(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
                date_time: None,
                time_zone: String::new(),
            }),
            ..make_google_event()
        };
        let event = CalendarEvent::from_google(google).unwrap();

        assert_eq!(
            event.start,
            Some(EventStart::Date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()))
        );
    }

    #[test]
    fn test_to_google_keeps_untouched_fields_and_replaces_reminders() {
        let mut event = CalendarEvent::from_google(make_google_event()).unwrap();
        event.reminders = Some(ReminderPolicy::default().reminder_set());

        let google = event.to_google().unwrap();

        assert_eq!(google.id, "e1");
        assert_eq!(google.description, "Daily sync");
        assert_eq!(google.location, "Room 4");
        assert_eq!(
            google.start.as_ref().map(|s| s.time_zone.as_str()),
            Some("Europe/Berlin")
        );

        let reminders = google.reminders.unwrap();
        assert!(!reminders.use_default);
        let pairs: Vec<(i64, &str)> = reminders
            .overrides
            .iter()
            .map(|r| (r.minutes, r.method.as_str()))
            .collect();
        assert_eq!(pairs, vec![(2, "popup"), (5, "popup")]);
    }

    #[test]
    fn test_to_google_without_provider_data() {
        let event = CalendarEvent {
            id: Some("e9".to_string()),
            summary: Some("Planning".to_string()),
            ..Default::default()
        };
        let google = event.to_google().unwrap();

        assert_eq!(google.id, "e9");
        assert_eq!(google.summary, "Planning");
        assert!(google.reminders.is_none());
    }
}
