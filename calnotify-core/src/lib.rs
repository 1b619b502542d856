//! Core engine for calnotify.
//!
//! Normalizes the reminders on upcoming calendar events:
//! - `classify` decides whether an event needs touching
//! - `recurrence` picks the event to write when a series is involved
//! - `writer` applies the reminder policy
//! - `report` folds per-event outcomes into a run summary
//! - `updater` drives a whole run against a `Calendar`

pub mod calendar;
pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod policy;
pub mod recurrence;
pub mod report;
pub mod updater;
pub mod writer;

pub use calendar::{Calendar, TimeWindow};
pub use error::{CalNotifyError, CalNotifyResult};
pub use event::*;
pub use updater::{RunOptions, Updater};
