//! Per-event outcomes and the run summary they fold into.

use serde::Serialize;

use crate::classify::{InvalidEvent, SkipReason};
use crate::event::EventStart;
use crate::recurrence::RecurringStrategy;

/// What happened to one listed event. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Updated {
        title: String,
        start: Option<EventStart>,
        context: Option<&'static str>,
    },
    Failed {
        title: String,
        context: Option<&'static str>,
        message: String,
    },
    Skipped {
        title: String,
        reason: SkipReason,
    },
    Invalid(InvalidEvent),
}

/// Tally of skipped events by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub all_day: usize,
    pub out_of_office: usize,
    pub already_configured: usize,
    pub deferred_to_master: usize,
}

impl SkipCounts {
    fn slot(&mut self, reason: SkipReason) -> &mut usize {
        match reason {
            SkipReason::AllDay => &mut self.all_day,
            SkipReason::OutOfOffice => &mut self.out_of_office,
            SkipReason::AlreadyConfigured => &mut self.already_configured,
            SkipReason::DeferredToMaster => &mut self.deferred_to_master,
        }
    }

    pub fn get(&self, reason: SkipReason) -> usize {
        match reason {
            SkipReason::AllDay => self.all_day,
            SkipReason::OutOfOffice => self.out_of_office,
            SkipReason::AlreadyConfigured => self.already_configured,
            SkipReason::DeferredToMaster => self.deferred_to_master,
        }
    }

    pub fn total(&self) -> usize {
        self.all_day + self.out_of_office + self.already_configured + self.deferred_to_master
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub strategy: RecurringStrategy,
    pub updated: usize,
    pub failed: usize,
    pub skipped: SkipCounts,
    /// Kept in full, these need an operator to look at them
    pub invalid: Vec<InvalidEvent>,
}

impl RunReport {
    /// Every event the run was handed, whatever became of it.
    pub fn total_processed(&self) -> usize {
        self.updated + self.failed + self.skipped.total() + self.invalid.len()
    }

    pub fn has_problems(&self) -> bool {
        self.failed > 0 || !self.invalid.is_empty()
    }
}

/// Folds outcomes into a `RunReport`.
#[derive(Debug)]
pub struct RunAggregator {
    report: RunReport,
}

impl RunAggregator {
    pub fn new(dry_run: bool, strategy: RecurringStrategy) -> Self {
        RunAggregator {
            report: RunReport {
                dry_run,
                strategy,
                updated: 0,
                failed: 0,
                skipped: SkipCounts::default(),
                invalid: Vec::new(),
            },
        }
    }

    pub fn record(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Updated { .. } => self.report.updated += 1,
            RunOutcome::Failed { .. } => self.report.failed += 1,
            RunOutcome::Skipped { reason, .. } => *self.report.skipped.slot(*reason) += 1,
            RunOutcome::Invalid(invalid) => self.report.invalid.push(invalid.clone()),
        }
    }

    pub fn summarize(self) -> RunReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skipped(reason: SkipReason) -> RunOutcome {
        RunOutcome::Skipped {
            title: "Event".to_string(),
            reason,
        }
    }

    #[test]
    fn test_totals_cover_every_outcome() {
        let mut agg = RunAggregator::new(false, RecurringStrategy::Master);

        agg.record(&RunOutcome::Updated {
            title: "Standup".to_string(),
            start: None,
            context: None,
        });
        agg.record(&RunOutcome::Failed {
            title: "Planning".to_string(),
            context: Some("master recurring event"),
            message: "410 Gone".to_string(),
        });
        agg.record(&skipped(SkipReason::AllDay));
        agg.record(&skipped(SkipReason::OutOfOffice));
        agg.record(&skipped(SkipReason::AlreadyConfigured));
        agg.record(&skipped(SkipReason::DeferredToMaster));
        agg.record(&skipped(SkipReason::DeferredToMaster));
        agg.record(&RunOutcome::Invalid(InvalidEvent {
            summary: None,
            id: None,
            reason: "event has no start time".to_string(),
            start_dump: "None".to_string(),
        }));

        let report = agg.summarize();
        assert_eq!(report.updated, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped.get(SkipReason::DeferredToMaster), 2);
        assert_eq!(report.skipped.total(), 5);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.total_processed(), 8);
        assert!(report.has_problems());
    }

    #[test]
    fn test_empty_run() {
        let report = RunAggregator::new(true, RecurringStrategy::Individual).summarize();
        assert_eq!(report.total_processed(), 0);
        assert!(report.dry_run);
        assert!(!report.has_problems());
    }
}
