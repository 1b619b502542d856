//! `Calendar` implementation on top of the Google Calendar API.

use anyhow::{Context, Result};
use calnotify_core::{CalNotifyError, CalNotifyResult, Calendar, CalendarEvent, TimeWindow};
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};
use log::debug;

use crate::convert::{FromGoogle, ToGoogle};
use crate::session::{Session, stored_accounts};

pub struct GoogleCalendar {
    client: Client,
}

impl GoogleCalendar {
    pub fn new(client: Client) -> Self {
        GoogleCalendar { client }
    }

    /// Connect as `account`, or as the only account with a stored session.
    pub async fn connect(account: Option<&str>) -> Result<Self> {
        let account = match account {
            Some(a) => a.to_string(),
            None => sole_account(stored_accounts()?)?,
        };

        debug!("Using Google account {}", account);

        let client = Session::load_valid(&account).await?.client()?;
        Ok(GoogleCalendar::new(client))
    }

    async fn fetch_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        expand_recurring: bool,
    ) -> Result<Vec<CalendarEvent>> {
        // startTime ordering is only accepted for expanded listings
        let order_by = if expand_recurring {
            OrderBy::StartTime
        } else {
            OrderBy::default()
        };

        let response = self
            .client
            .events()
            .list_all(
                calendar_id,
                "",                     // i_cal_uid
                0,                      // max_attendees
                order_by,               // order_by
                &[],                    // private_extended_property
                "",                     // q (search query)
                &[],                    // shared_extended_property
                false,                  // show_deleted
                false,                  // show_hidden_invitations
                expand_recurring,       // single_events
                &window.to_rfc3339(),   // time_max
                &window.from_rfc3339(), // time_min
                "",                     // time_zone
                "",                     // updated_min
            )
            .await
            .context("Failed to fetch events")?;

        debug!("Google returned {} events", response.body.len());

        response
            .body
            .into_iter()
            .filter(|event| event.status != "cancelled")
            .map(CalendarEvent::from_google)
            .collect()
    }

    async fn fetch_event(&self, calendar_id: &str, event_id: &str) -> Result<CalendarEvent> {
        let response = self
            .client
            .events()
            .get(
                calendar_id,
                event_id,
                0,  // max_attendees
                "", // time_zone
            )
            .await
            .with_context(|| format!("Failed to fetch event {}", event_id))?;

        CalendarEvent::from_google(response.body)
    }

    async fn replace_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> Result<()> {
        let google_event = event.to_google()?;

        self.client
            .events()
            .update(
                calendar_id,
                event_id,
                0,                 // conference_data_version
                0,                 // max_attendees
                false,             // send_notifications (deprecated)
                SendUpdates::None, // send_updates
                false,             // supports_attachments
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to update event: {}", event.title()))?;

        Ok(())
    }
}

impl Calendar for GoogleCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        expand_recurring: bool,
    ) -> CalNotifyResult<Vec<CalendarEvent>> {
        self.fetch_events(calendar_id, window, expand_recurring)
            .await
            .map_err(CalNotifyError::calendar)
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> CalNotifyResult<CalendarEvent> {
        self.fetch_event(calendar_id, event_id)
            .await
            .map_err(CalNotifyError::calendar)
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> CalNotifyResult<()> {
        self.replace_event(calendar_id, event_id, event)
            .await
            .map_err(CalNotifyError::calendar)
    }
}

fn sole_account(accounts: Vec<String>) -> Result<String> {
    match accounts.as_slice() {
        [] => anyhow::bail!(
            "No Google account connected.\n\n\
            Connect one with:\n  \
            calnotify auth"
        ),
        [only] => Ok(only.clone()),
        many => anyhow::bail!(
            "Several Google accounts are connected: {}\n\
            Pick one with --account or set `account` in the config file.",
            many.join(", ")
        ),
    }
}
