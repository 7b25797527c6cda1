//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Almanac - Spending totals, budgets and holiday-aware insights
#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Financial aggregation and holiday-insight engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (TOML)
    ///
    /// Falls back to ~/.local/share/almanac/config/almanac.toml, then the
    /// built-in defaults.
    #[arg(long, env = "ALMANAC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Totals, category breakdown and monthly summary
    Stats {
        /// Ledger snapshot (JSON: {user_id, transactions, budgets})
        #[arg(short, long)]
        ledger: PathBuf,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Budget progress and status
    Budgets {
        /// Ledger snapshot (JSON)
        #[arg(short, long)]
        ledger: PathBuf,

        /// Evaluate each budget over its period containing this date
        /// (YYYY-MM-DD). Without it all transactions count.
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Spending predictions for upcoming holidays
    Insights {
        /// Ledger snapshot (JSON)
        #[arg(short, long)]
        ledger: PathBuf,

        /// Holiday calendar (JSON array); defaults to the curated calendar
        #[arg(long)]
        holidays: Option<PathBuf>,

        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<String>,

        /// Days ahead to look for holidays
        #[arg(long)]
        window_days: Option<u32>,

        /// Days before each holiday to analyze
        #[arg(long)]
        pre_window_days: Option<u32>,

        /// Only holidays in this country (e.g. US)
        #[arg(short, long)]
        country: Option<String>,

        /// Only holidays with one of these tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List calendar holidays
    Holidays {
        /// Holiday calendar (JSON array); defaults to the curated calendar
        #[arg(long)]
        holidays: Option<PathBuf>,

        /// Country code
        #[arg(short, long, default_value = "US")]
        country: String,

        /// Start date (YYYY-MM-DD, default first of this month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, default start + 31 days)
        #[arg(long)]
        to: Option<String>,
    },

    /// Start the JSON API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Holiday calendar (JSON array); defaults to the curated calendar
        #[arg(long)]
        holidays: Option<PathBuf>,

        /// Allowed CORS origins (comma-separated)
        #[arg(long, value_delimiter = ',')]
        allowed_origins: Vec<String>,
    },
}
