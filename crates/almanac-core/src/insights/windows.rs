//! Calendar-day window arithmetic for holiday analysis
//!
//! Window bounds saturate at the representable date range instead of
//! overflowing; callers cap window lengths before getting here.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};

use crate::ledger::Ledger;
use crate::models::{DateRange, HolidayEvent};

fn days_before(day: NaiveDate, days: i64) -> NaiveDate {
    day.checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

/// The `days` calendar days immediately before `holiday`
pub fn pre_window(holiday: NaiveDate, days: u32) -> DateRange {
    DateRange::between(days_before(holiday, days as i64), days_before(holiday, 1))
}

/// The `baseline_days` calendar days immediately before the holiday's
/// `pre_days` pre-window
pub fn baseline_window(holiday: NaiveDate, pre_days: u32, baseline_days: u32) -> DateRange {
    let pre_start = days_before(holiday, pre_days as i64);
    DateRange::between(
        days_before(pre_start, baseline_days as i64),
        days_before(pre_start, 1),
    )
}

/// Every day covered by some holiday's pre-window
pub fn excluded_days<'a>(
    events: impl IntoIterator<Item = &'a HolidayEvent>,
    pre_window_days: u32,
) -> BTreeSet<NaiveDate> {
    let mut days = BTreeSet::new();
    for event in events {
        for offset in 1..=pre_window_days as i64 {
            match event.date.checked_sub_signed(Duration::days(offset)) {
                Some(day) => {
                    days.insert(day);
                }
                None => break,
            }
        }
    }
    days
}

/// Totals over a set of days
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSpend {
    /// Days counted
    pub days: i64,
    pub total: f64,
    pub by_category: BTreeMap<String, f64>,
}

impl WindowSpend {
    /// Mean spend per counted day (0 with no days)
    pub fn daily(&self) -> f64 {
        if self.days == 0 {
            0.0
        } else {
            self.total / self.days as f64
        }
    }

    pub fn category_daily(&self, category: &str) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        self.by_category.get(category).copied().unwrap_or(0.0) / self.days as f64
    }
}

/// Expense totals per calendar day, built once per ledger
#[derive(Debug, Clone, Default)]
pub struct DailyExpenses {
    days: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
    first_day: Option<NaiveDate>,
}

impl DailyExpenses {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut days: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
        for tx in ledger.transactions().values().filter(|t| t.is_expense()) {
            *days
                .entry(tx.day())
                .or_default()
                .entry(tx.category.clone())
                .or_insert(0.0) += tx.amount;
        }
        Self {
            days,
            first_day: ledger.first_date(),
        }
    }

    /// First day of recorded history (any transaction type)
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.first_day
    }

    /// Whether the whole range lies on or after the start of history
    pub fn covers(&self, range: DateRange) -> bool {
        match (self.first_day, range.from) {
            (Some(first), Some(from)) => from >= first,
            _ => false,
        }
    }

    /// Sum over `range`, skipping `excluded` days. Days before the start of
    /// history are not counted.
    pub fn sum(&self, range: DateRange, excluded: &BTreeSet<NaiveDate>) -> WindowSpend {
        let (Some(mut from), Some(to)) = (range.from, range.to) else {
            return WindowSpend::default();
        };
        match self.first_day {
            Some(first) if first > from => from = first,
            None => return WindowSpend::default(),
            _ => {}
        }
        if to < from {
            return WindowSpend::default();
        }

        let span = (to - from).num_days() + 1;
        let skipped = excluded.range(from..=to).count() as i64;

        let mut spend = WindowSpend {
            days: span - skipped,
            ..WindowSpend::default()
        };
        for (day, categories) in self.days.range(from..=to) {
            if excluded.contains(day) {
                continue;
            }
            for (category, amount) in categories {
                spend.total += amount;
                *spend.by_category.entry(category.clone()).or_insert(0.0) += amount;
            }
        }
        spend
    }
}
