mod commands;
mod render;
mod utils;

use anyhow::Result;
use calnotify_core::recurrence::RecurringStrategy;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calnotify")]
#[command(about = "Give your upcoming calendar events the same popup reminders")]
struct Cli {
    /// Use this config file instead of ~/.config/calnotify/config.toml
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect a Google account
    Auth,
    /// Normalize reminders on upcoming events
    Run {
        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// How to treat recurring events: master or individual
        #[arg(long)]
        strategy: Option<RecurringStrategy>,

        /// Calendar to operate on (defaults to the config value, then "primary")
        #[arg(short, long)]
        calendar: Option<String>,

        /// Google account to act as
        #[arg(long)]
        account: Option<String>,

        /// Also list skipped events
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show the config file, creating a default one if missing
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::Run {
            dry_run,
            strategy,
            calendar,
            account,
            verbose,
        } => {
            let args = commands::run::RunArgs {
                dry_run,
                strategy,
                calendar,
                account,
                verbose,
            };
            commands::run::run(cli.config.as_deref(), args).await
        }
        Commands::Config => commands::config::run(cli.config.as_deref()),
    }
}
