//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the engine config
//! - `load_ledger` - Read a ledger snapshot file
//! - `load_calendar` - Read a holiday file or fall back to the curated set
//! - `parse_date` / `print_json` - Argument and output helpers

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use almanac_core::{EngineConfig, HolidayCalendar, Ledger};

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    EngineConfig::load(path).context("Failed to load config")
}

pub fn load_ledger(path: &Path) -> Result<Ledger> {
    let ledger = Ledger::load(path)
        .with_context(|| format!("Failed to read ledger {}", path.display()))?;
    tracing::debug!(
        user_id = ledger.user_id(),
        transactions = ledger.len(),
        budgets = ledger.budgets().len(),
        "Loaded ledger"
    );
    Ok(ledger)
}

pub fn load_calendar(path: Option<&Path>) -> Result<HolidayCalendar> {
    match path {
        Some(path) => HolidayCalendar::load(path)
            .with_context(|| format!("Failed to read holidays {}", path.display())),
        None => HolidayCalendar::curated().context("Failed to load curated holidays"),
    }
}

/// Parse a `YYYY-MM-DD` flag value
pub fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
}

pub fn parse_optional_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value.map(|v| parse_date(v, flag)).transpose()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
