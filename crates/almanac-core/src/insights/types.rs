//! Core types for holiday insights

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an insight carries a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    /// At least one usable past occurrence
    Ok,
    /// No usable history for this holiday
    InsufficientData,
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightStatus::Ok => "ok",
            InsightStatus::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(InsightStatus::Ok),
            "insufficient_data" => Ok(InsightStatus::InsufficientData),
            _ => Err(format!("Unknown insight status: {}", s)),
        }
    }
}

/// Confidence grade derived from the usable sample count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// `None` for zero samples
    pub fn from_sample_count(k: usize) -> Option<Self> {
        match k {
            0 => None,
            1 => Some(Confidence::Low),
            2..=3 => Some(Confidence::Medium),
            _ => Some(Confidence::High),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

/// A category driving the expected change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category: String,
    /// Average pre-window excess over baseline, in currency
    pub delta: f64,
}

/// Spend-change prediction for one upcoming holiday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayInsight {
    pub holiday_event_id: i64,
    pub holiday_name: String,
    pub holiday_date: NaiveDate,
    pub status: InsightStatus,
    /// Only set when `status` is `ok`
    pub expected_change_pct: Option<f64>,
    pub confidence: Option<Confidence>,
    pub recommended_adjustment_pct: f64,
    pub explanation: String,
    pub sample_count: usize,
    /// First day of the upcoming pre-window
    pub window_start: NaiveDate,
    /// Last day of the upcoming pre-window
    pub window_end: NaiveDate,
    pub top_categories: Vec<TopCategory>,
}

impl HolidayInsight {
    pub fn is_ok(&self) -> bool {
        self.status == InsightStatus::Ok
    }
}

/// Per-call options for insight generation
///
/// Window overrides fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRequest {
    pub as_of: NaiveDate,
    pub window_days: Option<u32>,
    pub pre_window_days: Option<u32>,
    pub country_code: Option<String>,
    /// When non-empty, only holidays sharing a tag are analyzed
    pub culture_tags: Vec<String>,
    /// `false` yields no insights at all
    pub calendar_opt_in: bool,
    /// Bypass and refresh the cache
    pub force: bool,
}

impl InsightRequest {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            window_days: None,
            pre_window_days: None,
            country_code: None,
            culture_tags: Vec::new(),
            calendar_opt_in: true,
            force: false,
        }
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = Some(days);
        self
    }

    pub fn with_pre_window_days(mut self, days: u32) -> Self {
        self.pre_window_days = Some(days);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country_code = Some(country.into());
        self
    }

    pub fn with_culture_tags(mut self, tags: Vec<String>) -> Self {
        self.culture_tags = tags;
        self
    }

    pub fn with_opt_in(mut self, opt_in: bool) -> Self {
        self.calendar_opt_in = opt_in;
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}
