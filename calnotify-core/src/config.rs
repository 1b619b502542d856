//! calnotify configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::ReminderMethod;
use crate::policy::{ReminderPolicy, SkipRules};
use crate::recurrence::RecurringStrategy;
use crate::updater::{DEFAULT_CALENDAR_ID, DEFAULT_WINDOW_MONTHS, RunOptions};

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_window_months() -> u32 {
    DEFAULT_WINDOW_MONTHS
}

fn default_skip_marker() -> String {
    SkipRules::default().skip_marker
}

/// Configuration at ~/.config/calnotify/config.toml
///
/// Every field is optional; a missing file means all defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// Google account to act as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(default = "default_window_months")]
    pub window_months: u32,

    #[serde(default)]
    pub recurring_strategy: RecurringStrategy,

    #[serde(default)]
    pub reminders: RemindersConfig,

    #[serde(default = "default_skip_marker")]
    pub skip_marker: String,
}

/// The `[reminders]` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RemindersConfig {
    pub minutes: Vec<i64>,
    pub method: String,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        let policy = ReminderPolicy::default();
        RemindersConfig {
            minutes: policy.minutes().iter().copied().collect(),
            method: policy.method().to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_id: default_calendar_id(),
            account: None,
            window_months: default_window_months(),
            recurring_strategy: RecurringStrategy::default(),
            reminders: RemindersConfig::default(),
            skip_marker: default_skip_marker(),
        }
    }
}

impl Config {
    pub fn config_path() -> CalNotifyResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalNotifyError::Config("Could not determine config directory".into()))?
            .join("calnotify");

        Ok(config_dir.join("config.toml"))
    }

    /// Resolve an optional user-supplied path (with `~` expansion) or the default.
    pub fn resolve_path(path: Option<&str>) -> CalNotifyResult<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(shellexpand::tilde(p).as_ref())),
            None => Self::config_path(),
        }
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> CalNotifyResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            CalNotifyError::Config(format!("Could not parse {}: {e}", path.display()))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalNotifyResult<()> {
        if self.calendar_id.trim().is_empty() {
            return Err(CalNotifyError::Config("calendar_id must not be empty".into()));
        }
        if self.window_months == 0 {
            return Err(CalNotifyError::Config("window_months must be at least 1".into()));
        }
        self.policy()?;
        Ok(())
    }

    pub fn policy(&self) -> CalNotifyResult<ReminderPolicy> {
        ReminderPolicy::new(
            self.reminders.minutes.iter().copied(),
            ReminderMethod::from(self.reminders.method.as_str()),
        )
    }

    pub fn skip_rules(&self) -> CalNotifyResult<SkipRules> {
        Ok(SkipRules {
            policy: self.policy()?,
            skip_marker: self.skip_marker.clone(),
        })
    }

    /// Options for a run, before any command-line overrides.
    pub fn run_options(&self) -> CalNotifyResult<RunOptions> {
        Ok(RunOptions {
            calendar_id: self.calendar_id.clone(),
            dry_run: false,
            strategy: self.recurring_strategy,
            window_months: self.window_months,
            rules: self.skip_rules()?,
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalNotifyResult<()> {
        let contents = format!(
            "\
# calnotify configuration

# Calendar to normalize:
# calendar_id = \"{}\"

# Google account (as shown by `calnotify auth`):
# account = \"you@example.com\"

# How far ahead to scan, in months:
# window_months = {}

# Recurring events: \"master\" updates each series once, \"individual\" every occurrence:
# recurring_strategy = \"master\"

# Events whose title contains this text are left alone:
# skip_marker = \"{}\"

# [reminders]
# minutes = [2, 5]
# method = \"popup\"
",
            DEFAULT_CALENDAR_ID,
            DEFAULT_WINDOW_MONTHS,
            default_skip_marker()
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalNotifyError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalNotifyError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
