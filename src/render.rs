//! Terminal rendering for run outcomes and the run summary.

use calnotify_core::classify::{InvalidEvent, SkipReason};
use calnotify_core::report::{RunOutcome, RunReport};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

fn context_suffix(context: &Option<&'static str>) -> String {
    context.map(|c| format!(" ({c})")).unwrap_or_default()
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(none)")
}

impl Render for InvalidEvent {
    fn render(&self) -> String {
        format!(
            "id: {}, summary: {}, reason: {}, start: {}",
            or_none(&self.id),
            or_none(&self.summary),
            self.reason,
            self.start_dump
        )
    }
}

/// One line for an outcome, or `None` when it is only worth showing in verbose mode.
pub fn render_outcome(outcome: &RunOutcome, dry_run: bool, verbose: bool) -> Option<String> {
    match outcome {
        RunOutcome::Updated {
            title,
            start,
            context,
        } => {
            let verb = if dry_run { "Would update" } else { "Updated" };
            let when = start.as_ref().map(|s| s.to_string()).unwrap_or_default();
            Some(format!(
                "{} {} {}{} {}",
                "✓".green(),
                verb,
                title.green(),
                context_suffix(context).dimmed(),
                when.dimmed()
            ))
        }
        RunOutcome::Failed {
            title,
            context,
            message,
        } => Some(format!(
            "{} Error updating {}{}: {}",
            "✗".red(),
            title.red(),
            context_suffix(context),
            message
        )),
        RunOutcome::Skipped { title, reason } => verbose.then(|| {
            format!("- Skipped {} ({})", title, reason)
                .dimmed()
                .to_string()
        }),
        RunOutcome::Invalid(invalid) => Some(format!(
            "{} Invalid event: {}",
            "!".yellow(),
            invalid.render().yellow()
        )),
    }
}

impl Render for RunReport {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        let title = if self.dry_run {
            format!("Summary ({} strategy, dry run)", self.strategy)
        } else {
            format!("Summary ({} strategy)", self.strategy)
        };
        lines.push(title.bold().to_string());

        let updated_label = if self.dry_run { "Would update" } else { "Updated" };
        lines.push(count_line(updated_label, self.updated));
        if self.failed > 0 {
            lines.push(count_line("Failed", self.failed).red().to_string());
        }

        for reason in [
            SkipReason::AllDay,
            SkipReason::OutOfOffice,
            SkipReason::AlreadyConfigured,
            SkipReason::DeferredToMaster,
        ] {
            let count = self.skipped.get(reason);
            if count > 0 {
                lines.push(count_line(&format!("Skipped ({reason})"), count));
            }
        }

        if !self.invalid.is_empty() {
            lines.push(count_line("Invalid", self.invalid.len()).yellow().to_string());
        }

        lines.push(count_line("Total processed", self.total_processed()));

        if !self.invalid.is_empty() {
            lines.push(String::new());
            lines.push("Invalid events:".yellow().to_string());
            for invalid in &self.invalid {
                lines.push(format!("  - {}", invalid.render()));
            }
        }

        if self.has_problems() {
            lines.push(String::new());
            lines.push(
                "Some events need attention; rerun with RUST_LOG=info for details."
                    .red()
                    .to_string(),
            );
        }

        lines.join("\n")
    }
}

fn count_line(label: &str, count: usize) -> String {
    format!("  {:<50} {:>5}", format!("{label}:"), count)
}
