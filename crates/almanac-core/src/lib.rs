//! Almanac Core Library
//!
//! Financial aggregation and holiday-insight engine:
//! - Ledger accessor scoped to one user
//! - Category spend, monthly series and summary totals
//! - Budget progress and status classification
//! - Holiday calendar with a curated seed
//! - Holiday-anticipation insights with confidence grading
//! - Insight cache keyed per user and holiday-set version
//! - TOML engine configuration with user overrides
//!
//! Every computation is synchronous and pure over an immutable snapshot.

pub mod aggregate;
pub mod budget;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod insights;
pub mod ledger;
pub mod models;

/// Fixtures for unit tests and downstream crates
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::Aggregator;
pub use budget::{classify, duplicate_categories, evaluate, evaluate_current_period};
pub use calendar::HolidayCalendar;
pub use config::{CacheConfig, EngineConfig, InsightConfig};
pub use engine::Engine;
pub use error::{Error, Result};
pub use insights::{
    CacheKey, Confidence, HolidayInsight, HolidayInsightGenerator, InsightCache, InsightRequest,
    InsightStatus, TopCategory,
};
pub use ledger::{Ledger, LedgerSnapshot};
pub use models::{
    Budget, BudgetPeriod, BudgetProgress, BudgetStatus, CategorySpend, DateRange, HolidayEvent,
    HolidayType, MonthlySummary, MonthlyTotals, Transaction, TransactionStats, TransactionType,
};
