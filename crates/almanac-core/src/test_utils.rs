//! Test fixtures for almanac-core
//!
//! Shared builders for transactions, budgets, holidays and synthetic ledgers.
//! Other crates reach them through the `test-utils` feature.

use chrono::{Duration, NaiveDate};

use crate::ledger::Ledger;
use crate::models::{
    parse_datetime, Budget, BudgetPeriod, HolidayEvent, HolidayType, Transaction, TransactionType,
};

/// User id every fixture belongs to
pub const USER_ID: i64 = 1;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn transaction(id: i64, kind: TransactionType, category: &str, amount: f64, day: &str) -> Transaction {
    Transaction {
        id,
        user_id: USER_ID,
        description: format!("{} #{}", category, id),
        amount,
        category: category.to_string(),
        kind,
        date: parse_datetime(day).unwrap(),
    }
}

pub fn expense(id: i64, category: &str, amount: f64, day: &str) -> Transaction {
    transaction(id, TransactionType::Expense, category, amount, day)
}

pub fn income(id: i64, amount: f64, day: &str) -> Transaction {
    transaction(id, TransactionType::Income, "Salary", amount, day)
}

/// Monthly budget
pub fn budget(id: i64, category: &str, amount: f64) -> Budget {
    budget_with_period(id, category, amount, BudgetPeriod::Monthly)
}

pub fn budget_with_period(id: i64, category: &str, amount: f64, period: BudgetPeriod) -> Budget {
    Budget {
        id,
        user_id: USER_ID,
        category: category.to_string(),
        amount,
        period,
    }
}

/// US cultural holiday
pub fn holiday(id: i64, name: &str, day: &str) -> HolidayEvent {
    HolidayEvent {
        id,
        country_code: "US".to_string(),
        name: name.to_string(),
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        kind: HolidayType::Cultural,
        tags: vec![],
        source: "test".to_string(),
    }
}

/// Builds synthetic ledgers with a steady daily spend and optional
/// pre-holiday lifts.
#[derive(Clone)]
pub struct LedgerBuilder {
    next_id: i64,
    transactions: Vec<Transaction>,
}

impl Default for LedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerBuilder {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            transactions: Vec::new(),
        }
    }

    fn push(&mut self, kind: TransactionType, category: &str, amount: f64, day: NaiveDate) {
        self.transactions.push(Transaction {
            id: self.next_id,
            user_id: USER_ID,
            description: String::new(),
            amount,
            category: category.to_string(),
            kind,
            date: day.and_hms_opt(12, 0, 0).unwrap(),
        });
        self.next_id += 1;
    }

    /// One expense of `amount` in `category` on every day of `from..=to`
    pub fn daily(mut self, from: NaiveDate, to: NaiveDate, category: &str, amount: f64) -> Self {
        let mut day = from;
        while day <= to {
            self.push(TransactionType::Expense, category, amount, day);
            day += Duration::days(1);
        }
        self
    }

    /// Extra daily spend in the `days` days before `holiday`
    pub fn lift(mut self, holiday: NaiveDate, days: i64, category: &str, extra: f64) -> Self {
        for offset in 1..=days {
            self.push(TransactionType::Expense, category, extra, holiday - Duration::days(offset));
        }
        self
    }

    pub fn expense(mut self, category: &str, amount: f64, day: NaiveDate) -> Self {
        self.push(TransactionType::Expense, category, amount, day);
        self
    }

    pub fn income(mut self, amount: f64, day: NaiveDate) -> Self {
        self.push(TransactionType::Income, "Salary", amount, day);
        self
    }

    pub fn transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn build(self) -> Ledger {
        Ledger::new(USER_ID, self.transactions, Vec::new())
    }
}
