use anyhow::Result;
use calnotify_core::config::Config;
use calnotify_core::recurrence::RecurringStrategy;
use calnotify_core::Updater;
use calnotify_google::GoogleCalendar;
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::render::{Render, render_outcome};
use crate::utils::tui;

/// Command-line overrides for a run.
pub struct RunArgs {
    pub dry_run: bool,
    pub strategy: Option<RecurringStrategy>,
    pub calendar: Option<String>,
    pub account: Option<String>,
    pub verbose: bool,
}

pub async fn run(config_path: Option<&str>, args: RunArgs) -> Result<()> {
    let path = Config::resolve_path(config_path)?;
    let config = Config::load_from(&path)?;

    let mut options = config.run_options()?;
    options.dry_run = args.dry_run;
    if let Some(strategy) = args.strategy {
        options.strategy = strategy;
    }
    if let Some(calendar) = args.calendar {
        options.calendar_id = calendar;
    }

    let account = args.account.or(config.account);
    let calendar = GoogleCalendar::connect(account.as_deref()).await?;

    if options.dry_run {
        println!("{}\n", "Dry run: no events will be changed.".yellow());
    }

    let spinner = tui::create_spinner(format!("Fetching events from {}", options.calendar_id));
    let dry_run = options.dry_run;
    let verbose = args.verbose;

    let updater = Updater::new(&calendar, options);
    let result = updater
        .run(Utc::now(), |outcome| {
            spinner.finish_and_clear();
            if let Some(line) = render_outcome(outcome, dry_run, verbose) {
                println!("{}", line);
            }
        })
        .await;
    spinner.finish_and_clear();

    let report = result?;

    if report.total_processed() == 0 {
        println!("No upcoming events found.");
        return Ok(());
    }

    println!("\n{}", report.render());

    Ok(())
}
