//! Domain models for Almanac

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Transaction direction
///
/// Unknown strings are kept as `Unrecognized` so a snapshot still parses and
/// the aggregator can reject it with a typed error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Income,
    Expense,
    Unrecognized(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "income" => Self::Income,
            "expense" => Self::Expense,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match Self::from(s.to_string()) {
            Self::Unrecognized(raw) => Err(format!("Unknown transaction type: {}", raw)),
            known => Ok(known),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger entry. `amount` is always a magnitude; `kind` carries the sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub date: NaiveDateTime,
}

impl Transaction {
    /// Calendar day the transaction falls on
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// `YYYY-MM` bucket used by the monthly series
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }
}

/// Parse a transaction timestamp.
///
/// Accepts RFC 3339 (the offset is dropped, keeping the local calendar day),
/// `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD`
/// (midnight).
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn deserialize_datetime<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid transaction date: {}", raw)))
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// The period instance containing `date`.
    ///
    /// Weeks run Monday through Sunday.
    pub fn window_containing(&self, date: NaiveDate) -> DateRange {
        match self {
            Self::Weekly => {
                let back = Duration::days(date.weekday().num_days_from_monday() as i64);
                let start = date.checked_sub_signed(back).unwrap_or(NaiveDate::MIN);
                let end = start.checked_add_signed(Duration::days(6)).unwrap_or(NaiveDate::MAX);
                DateRange::between(start, end)
            }
            Self::Monthly => {
                let start = date.with_day(1).unwrap_or(date);
                let next = if date.month() == 12 {
                    NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
                };
                let end = next.and_then(|d| d.pred_opt()).unwrap_or(date);
                DateRange::between(start, end)
            }
            Self::Yearly => {
                let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
                let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
                DateRange::between(start, end)
            }
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

/// Inclusive calendar-day range. Missing bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Unbounded on both sides
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    /// Number of calendar days, when both bounds are set
    pub fn days(&self) -> Option<i64> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to >= from => Some((to - from).num_days() + 1),
            (Some(_), Some(_)) => Some(0),
            _ => None,
        }
    }
}

/// Kind of holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HolidayType {
    Public,
    Religious,
    #[default]
    Cultural,
}

impl HolidayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Religious => "religious",
            Self::Cultural => "cultural",
        }
    }
}

impl std::fmt::Display for HolidayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_source() -> String {
    "curated".to_string()
}

/// A dated calendar event for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEvent {
    pub id: i64,
    pub country_code: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: HolidayType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_source")]
    pub source: String,
}

impl HolidayEvent {
    /// Identifier shared by every occurrence of the same holiday
    /// ("Mother's Day" and "mothers  day" both become `mothers_day`).
    pub fn identifier(&self) -> String {
        normalize_holiday_name(&self.name)
    }

    /// Same holiday in the same country, possibly a different year
    pub fn is_occurrence_of(&self, other: &HolidayEvent) -> bool {
        self.country_code.eq_ignore_ascii_case(&other.country_code)
            && self.identifier() == other.identifier()
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter()
            .any(|t| self.tags.iter().any(|own| own.eq_ignore_ascii_case(t.trim())))
    }
}

pub fn normalize_holiday_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else if c == '\'' || c == '\u{2019}' {
            // apostrophes join: "Mother's" -> "mothers"
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Spend total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    pub amount: f64,
}

/// One point of the monthly income/expense series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

/// Income/expense pair keyed by month in [`TransactionStats::monthly_summary`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub income: f64,
    pub expenses: f64,
}

/// Dashboard totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub transactions_count: usize,
    pub average_transaction_amount: f64,
    /// Expense totals by category
    pub category_breakdown: BTreeMap<String, f64>,
    /// `YYYY-MM` -> totals, ascending by month
    pub monthly_summary: BTreeMap<String, MonthlyTotals>,
}

/// Budget health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::NearLimit => "near_limit",
            Self::OverBudget => "over_budget",
        }
    }
}

impl std::str::FromStr for BudgetStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "on_track" => Ok(Self::OnTrack),
            "near_limit" => Ok(Self::NearLimit),
            "over_budget" => Ok(Self::OverBudget),
            _ => Err(format!("Unknown budget status: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluated state of one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub budget_id: i64,
    pub category: String,
    pub period: BudgetPeriod,
    /// Budget limit as given
    pub amount: f64,
    pub spent: f64,
    /// `amount - spent`; negative when over budget
    pub remaining: f64,
    /// `|remaining|` when over budget
    pub over_by: Option<f64>,
    /// Clamped to 0..=100
    pub progress_pct: f64,
    /// Unclamped progress, used for classification
    pub raw_progress_pct: f64,
    pub status: BudgetStatus,
    /// Set when the budget itself is malformed
    pub error: Option<String>,
}
