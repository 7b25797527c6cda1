//! Almanac CLI - Financial aggregation and holiday insights
//!
//! Usage:
//!   almanac stats --ledger ledger.json        Totals and monthly summary
//!   almanac budgets --ledger ledger.json      Budget progress
//!   almanac insights --ledger ledger.json     Upcoming holiday predictions
//!   almanac serve --port 3000                 Start JSON API server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Stats { ledger, from, to } => {
            commands::cmd_stats(&config, &ledger, from.as_deref(), to.as_deref(), cli.json)
        }
        Commands::Budgets { ledger, as_of } => {
            commands::cmd_budgets(&config, &ledger, as_of.as_deref(), cli.json)
        }
        Commands::Insights {
            ledger,
            holidays,
            as_of,
            window_days,
            pre_window_days,
            country,
            tags,
        } => commands::cmd_insights(
            &config,
            &ledger,
            holidays.as_deref(),
            as_of.as_deref(),
            window_days,
            pre_window_days,
            country.as_deref(),
            &tags,
            cli.json,
        ),
        Commands::Holidays {
            holidays,
            country,
            from,
            to,
        } => commands::cmd_holidays(
            holidays.as_deref(),
            &country,
            from.as_deref(),
            to.as_deref(),
            cli.json,
        ),
        Commands::Serve {
            port,
            host,
            holidays,
            allowed_origins,
        } => commands::cmd_serve(config, &host, port, holidays.as_deref(), allowed_origins).await,
    }
}
