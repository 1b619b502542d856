//! Picks which event a reminder update should land on when an event belongs
//! to a recurring series.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::classify::{SkipReason, Verdict, classify};
use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::CalendarEvent;
use crate::policy::SkipRules;

pub const MASTER_CONTEXT: &str = "master recurring event";
pub const INSTANCE_CONTEXT: &str = "recurring instance";

/// Run-wide policy for recurring series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringStrategy {
    /// Update each series once, through its master
    #[default]
    Master,
    /// Update every occurrence on its own
    Individual,
}

impl RecurringStrategy {
    /// Whether listings should materialize every occurrence.
    pub fn expands_recurring(&self) -> bool {
        matches!(self, RecurringStrategy::Individual)
    }
}

impl fmt::Display for RecurringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurringStrategy::Master => f.write_str("master"),
            RecurringStrategy::Individual => f.write_str("individual"),
        }
    }
}

impl FromStr for RecurringStrategy {
    type Err = CalNotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(RecurringStrategy::Master),
            "individual" => Ok(RecurringStrategy::Individual),
            other => Err(CalNotifyError::Config(format!(
                "Unknown recurring strategy '{other}' (expected 'master' or 'individual')"
            ))),
        }
    }
}

/// What to do with an eligible event, before any calendar call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Update the event itself, with an optional context label
    PassThrough(Option<&'static str>),
    /// Fetch and update the series master with this id
    FetchMaster(String),
    /// The master was already handled through an earlier instance
    Deferred,
}

/// Decide the mutation target. Claims the master id in `resolved_masters`
/// when returning `FetchMaster`, so later instances of the series defer.
///
/// Under the master strategy an unexpanded listing also contains the series
/// masters themselves, which carry no series id. Their own id is claimed
/// too, so a master and its modified instances never both trigger a write.
pub fn plan(
    event: &CalendarEvent,
    strategy: RecurringStrategy,
    resolved_masters: &mut HashSet<String>,
) -> Plan {
    match (strategy, event.recurring_event_id.as_deref()) {
        (RecurringStrategy::Individual, None) => Plan::PassThrough(None),
        (RecurringStrategy::Individual, Some(_)) => Plan::PassThrough(Some(INSTANCE_CONTEXT)),
        (RecurringStrategy::Master, None) => match event.id.as_deref() {
            Some(id) if !resolved_masters.insert(id.to_string()) => Plan::Deferred,
            _ => Plan::PassThrough(None),
        },
        (RecurringStrategy::Master, Some(master_id)) => {
            if resolved_masters.insert(master_id.to_string()) {
                Plan::FetchMaster(master_id.to_string())
            } else {
                Plan::Deferred
            }
        }
    }
}

/// The event to update and how to describe it.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Target {
        event: CalendarEvent,
        context: Option<&'static str>,
    },
    Deferred,
    /// The fetched master is itself exempt and must not be written
    MasterSkipped(SkipReason),
}

/// Resolve the mutation target for `event`, fetching the series master if
/// the plan calls for it. A failed master fetch leaves the id claimed.
///
/// A fetched master goes through the same classification as listed events,
/// so a master that is already configured or marked out of office is left
/// alone even when one of its instances is eligible.
pub async fn resolve<C: Calendar>(
    calendar: &C,
    calendar_id: &str,
    event: CalendarEvent,
    strategy: RecurringStrategy,
    rules: &SkipRules,
    resolved_masters: &mut HashSet<String>,
) -> CalNotifyResult<Resolution> {
    match plan(&event, strategy, resolved_masters) {
        Plan::PassThrough(context) => Ok(Resolution::Target { event, context }),
        Plan::Deferred => {
            debug!(
                "'{}' defers to already-resolved master {:?}",
                event.title(),
                event.recurring_event_id
            );
            Ok(Resolution::Deferred)
        }
        Plan::FetchMaster(master_id) => {
            debug!("Fetching master {} for '{}'", master_id, event.title());
            let master = calendar.get_event(calendar_id, &master_id).await?;

            match classify(Some(&master), rules) {
                Verdict::Eligible => Ok(Resolution::Target {
                    event: master,
                    context: Some(MASTER_CONTEXT),
                }),
                Verdict::Skip(reason) => {
                    debug!("Master {} is skipped: {}", master_id, reason);
                    Ok(Resolution::MasterSkipped(reason))
                }
                Verdict::Invalid(invalid) => Err(CalNotifyError::Calendar(format!(
                    "master event {} is unusable: {}",
                    master_id, invalid.reason
                ))),
            }
        }
    }
}
