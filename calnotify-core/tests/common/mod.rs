#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use calnotify_core::{
    Calendar, CalNotifyError, CalNotifyResult, CalendarEvent, EventStart, ReminderMethod,
    ReminderOverride, ReminderSet, TimeWindow,
};
use chrono::{NaiveDate, TimeZone, Utc};

/// In-memory calendar that records every call.
#[derive(Default)]
pub struct FakeCalendar {
    pub listing: RefCell<Vec<CalendarEvent>>,
    pub store: RefCell<HashMap<String, CalendarEvent>>,
    pub fail_listing: bool,
    pub fail_updates: HashSet<String>,
    pub list_calls: RefCell<Vec<bool>>,
    pub get_calls: RefCell<Vec<String>>,
    pub updates: RefCell<Vec<(String, CalendarEvent)>>,
}

impl FakeCalendar {
    pub fn with_listing(events: Vec<CalendarEvent>) -> Self {
        let calendar = FakeCalendar::default();
        for event in &events {
            if let Some(id) = &event.id {
                calendar.store.borrow_mut().insert(id.clone(), event.clone());
            }
        }
        *calendar.listing.borrow_mut() = events;
        calendar
    }

    /// Make an event fetchable by id without listing it (e.g. a series master).
    pub fn insert(&self, event: CalendarEvent) {
        let id = event.id.clone().expect("stored events need an id");
        self.store.borrow_mut().insert(id, event);
    }

    pub fn stored(&self, id: &str) -> Option<CalendarEvent> {
        self.store.borrow().get(id).cloned()
    }

    pub fn updated_ids(&self) -> Vec<String> {
        self.updates.borrow().iter().map(|(id, _)| id.clone()).collect()
    }
}

impl Calendar for FakeCalendar {
    async fn list_events(
        &self,
        _calendar_id: &str,
        _window: &TimeWindow,
        expand_recurring: bool,
    ) -> CalNotifyResult<Vec<CalendarEvent>> {
        self.list_calls.borrow_mut().push(expand_recurring);
        if self.fail_listing {
            return Err(CalNotifyError::Calendar("listing unavailable".to_string()));
        }
        Ok(self.listing.borrow().clone())
    }

    async fn get_event(&self, _calendar_id: &str, event_id: &str) -> CalNotifyResult<CalendarEvent> {
        self.get_calls.borrow_mut().push(event_id.to_string());
        self.stored(event_id)
            .ok_or_else(|| CalNotifyError::Calendar(format!("404 Not Found: {event_id}")))
    }

    async fn update_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> CalNotifyResult<()> {
        if self.fail_updates.contains(event_id) {
            return Err(CalNotifyError::Calendar(format!("410 Gone: {event_id}")));
        }

        self.updates.borrow_mut().push((event_id.to_string(), event.clone()));
        self.store.borrow_mut().insert(event_id.to_string(), event.clone());
        for listed in self.listing.borrow_mut().iter_mut() {
            if listed.id.as_deref() == Some(event_id) {
                *listed = event.clone();
            }
        }
        Ok(())
    }
}

pub fn timed(id: &str, summary: &str) -> CalendarEvent {
    CalendarEvent {
        id: Some(id.to_string()),
        summary: Some(summary.to_string()),
        start: Some(EventStart::DateTime {
            date_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            time_zone: "UTC".to_string(),
        }),
        reminders: None,
        recurring_event_id: None,
        provider_data: None,
    }
}

pub fn all_day(id: &str, summary: &str) -> CalendarEvent {
    CalendarEvent {
        start: Some(EventStart::Date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())),
        ..timed(id, summary)
    }
}

pub fn instance(id: &str, master_id: &str) -> CalendarEvent {
    CalendarEvent {
        recurring_event_id: Some(master_id.to_string()),
        ..timed(id, "Weekly sync")
    }
}

pub fn with_minutes(mut event: CalendarEvent, minutes: &[i64]) -> CalendarEvent {
    event.reminders = Some(ReminderSet {
        use_default: false,
        overrides: minutes
            .iter()
            .map(|&minutes| ReminderOverride {
                minutes,
                method: ReminderMethod::Popup,
            })
            .collect(),
    });
    event
}

pub fn desired_reminders() -> ReminderSet {
    ReminderSet {
        use_default: false,
        overrides: vec![
            ReminderOverride { minutes: 2, method: ReminderMethod::Popup },
            ReminderOverride { minutes: 5, method: ReminderMethod::Popup },
        ],
    }
}
