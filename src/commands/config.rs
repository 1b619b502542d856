use anyhow::Result;
use calnotify_core::config::Config;
use owo_colors::OwoColorize;

pub fn run(config_path: Option<&str>) -> Result<()> {
    let path = Config::resolve_path(config_path)?;

    if !path.exists() {
        Config::create_default_config(&path)?;
        println!("Created default config file.\n");
    }

    let config = Config::load_from(&path)?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", path.display());
    println!(
        "  Google:     {}",
        calnotify_google::app_config::base_dir()?.display()
    );
    println!();

    println!("{}", "Settings".bold());
    println!("  Calendar:   {}", config.calendar_id);
    println!(
        "  Account:    {}",
        config.account.as_deref().unwrap_or("(only connected account)")
    );
    println!("  Window:     {} months", config.window_months);
    println!("  Recurring:  {}", config.recurring_strategy);
    println!(
        "  Reminders:  {} via {}",
        config
            .reminders
            .minutes
            .iter()
            .map(|m| format!("{m}m"))
            .collect::<Vec<_>>()
            .join(", "),
        config.reminders.method
    );
    println!("  Skip title: {}", config.skip_marker);

    Ok(())
}
