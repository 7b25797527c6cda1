//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod budgets;
pub mod cache;
pub mod holidays;
pub mod stats;

// Re-export all handlers for use in router
pub use budgets::*;
pub use cache::*;
pub use holidays::*;
pub use stats::*;

use chrono::NaiveDate;

use crate::AppError;

/// Parse an optional `YYYY-MM-DD` parameter
pub(crate) fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| AppError::bad_request(&format!("Invalid {} date format (use YYYY-MM-DD)", field)))
}
