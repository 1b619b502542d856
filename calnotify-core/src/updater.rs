//! Drives a full run: list the window, then classify, resolve, write and
//! record each event in listing order.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::calendar::{Calendar, TimeWindow};
use crate::classify::{SkipReason, Verdict, classify};
use crate::error::CalNotifyResult;
use crate::event::CalendarEvent;
use crate::policy::SkipRules;
use crate::recurrence::{MASTER_CONTEXT, RecurringStrategy, Resolution, resolve};
use crate::report::{RunAggregator, RunOutcome, RunReport};
use crate::writer::{WriteResult, apply};

/// Google's alias for the user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";

pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

/// Knobs for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub calendar_id: String,
    pub dry_run: bool,
    pub strategy: RecurringStrategy,
    pub window_months: u32,
    pub rules: SkipRules,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            dry_run: false,
            strategy: RecurringStrategy::default(),
            window_months: DEFAULT_WINDOW_MONTHS,
            rules: SkipRules::default(),
        }
    }
}

pub struct Updater<'a, C: Calendar> {
    calendar: &'a C,
    options: RunOptions,
}

impl<'a, C: Calendar> Updater<'a, C> {
    pub fn new(calendar: &'a C, options: RunOptions) -> Self {
        Updater { calendar, options }
    }

    /// Run over the window starting at `now`.
    ///
    /// Only a failed listing is an error. Every per-event problem becomes an
    /// outcome, passed to `on_outcome` as soon as it is known.
    pub async fn run(
        &self,
        now: DateTime<Utc>,
        mut on_outcome: impl FnMut(&RunOutcome),
    ) -> CalNotifyResult<RunReport> {
        let window = TimeWindow::months_ahead(now, self.options.window_months)?;
        let expand = self.options.strategy.expands_recurring();

        info!(
            "Listing events in {} from {} to {} (expand recurring: {})",
            self.options.calendar_id,
            window.from_rfc3339(),
            window.to_rfc3339(),
            expand
        );

        let events = self
            .calendar
            .list_events(&self.options.calendar_id, &window, expand)
            .await?;

        debug!("Listed {} events", events.len());

        self.process(events, &mut on_outcome).await
    }

    /// Push already-listed events through the pipeline.
    pub async fn process(
        &self,
        events: Vec<CalendarEvent>,
        mut on_outcome: impl FnMut(&RunOutcome),
    ) -> CalNotifyResult<RunReport> {
        let mut aggregator = RunAggregator::new(self.options.dry_run, self.options.strategy);
        let mut resolved_masters = HashSet::new();

        for event in events {
            let outcome = self.process_event(event, &mut resolved_masters).await;
            aggregator.record(&outcome);
            on_outcome(&outcome);
        }

        Ok(aggregator.summarize())
    }

    async fn process_event(
        &self,
        event: CalendarEvent,
        resolved_masters: &mut HashSet<String>,
    ) -> RunOutcome {
        let title = event.title().to_string();

        match classify(Some(&event), &self.options.rules) {
            Verdict::Invalid(invalid) => {
                debug!("'{}' is invalid: {}", title, invalid.reason);
                return RunOutcome::Invalid(invalid);
            }
            Verdict::Skip(reason) => {
                debug!("Skipping '{}': {}", title, reason);
                return RunOutcome::Skipped { title, reason };
            }
            Verdict::Eligible => {}
        }

        let resolution = resolve(
            self.calendar,
            &self.options.calendar_id,
            event,
            self.options.strategy,
            &self.options.rules,
            resolved_masters,
        )
        .await;

        let (mut target, context) = match resolution {
            Ok(Resolution::Target { event, context }) => (event, context),
            Ok(Resolution::Deferred) => {
                return RunOutcome::Skipped {
                    title,
                    reason: SkipReason::DeferredToMaster,
                };
            }
            Ok(Resolution::MasterSkipped(reason)) => {
                return RunOutcome::Skipped { title, reason };
            }
            Err(e) => {
                return RunOutcome::Failed {
                    title,
                    context: Some(MASTER_CONTEXT),
                    message: e.to_string(),
                };
            }
        };

        let result = apply(
            self.calendar,
            &self.options.calendar_id,
            &mut target,
            context,
            &self.options.rules.policy,
            self.options.dry_run,
        )
        .await;

        match result {
            WriteResult::Success => RunOutcome::Updated {
                title: target.title().to_string(),
                start: target.start.clone(),
                context,
            },
            WriteResult::Failure(message) => RunOutcome::Failed {
                title: target.title().to_string(),
                context,
                message,
            },
        }
    }
}
