//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, ledger and calendar loading, output)
//! - `reports` - Totals and monthly summary (stats)
//! - `budgets` - Budget progress
//! - `insights` - Holiday insights
//! - `holidays` - Calendar listing
//! - `serve` - Web server command

pub mod budgets;
pub mod core;
pub mod holidays;
pub mod insights;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use holidays::*;
pub use insights::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
