//! Aggregator - category spend, monthly series and summary totals

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::{
    CategorySpend, DateRange, MonthlySummary, MonthlyTotals, Transaction, TransactionStats,
    TransactionType,
};

/// Validated set of transactions to aggregate over
///
/// Construction fails on the first malformed transaction, so every method
/// works on clean data.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    transactions: Vec<&'a Transaction>,
}

impl<'a> Aggregator<'a> {
    /// Aggregate the ledger's transactions inside `range`
    pub fn new(ledger: &'a Ledger, range: DateRange) -> Result<Self> {
        Self::from_transactions(ledger.window(range))
    }

    pub fn from_transactions(transactions: impl IntoIterator<Item = &'a Transaction>) -> Result<Self> {
        let transactions: Vec<&Transaction> = transactions.into_iter().collect();
        for tx in &transactions {
            validate(tx)?;
        }
        Ok(Self { transactions })
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of amounts per category for one transaction type.
    /// Categories without matching transactions are absent.
    pub fn category_spend(&self, kind: &TransactionType) -> BTreeMap<String, f64> {
        let mut spend: BTreeMap<String, f64> = BTreeMap::new();
        for tx in self.transactions.iter().filter(|t| &t.kind == kind) {
            *spend.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
        }
        spend
    }

    /// Expense spend per category, largest first
    pub fn ranked_expenses(&self) -> Vec<CategorySpend> {
        let mut ranked: Vec<CategorySpend> = self
            .category_spend(&TransactionType::Expense)
            .into_iter()
            .map(|(category, amount)| CategorySpend { category, amount })
            .collect();
        ranked.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        ranked
    }

    fn monthly_totals(&self) -> BTreeMap<String, MonthlyTotals> {
        let mut months: BTreeMap<String, MonthlyTotals> = BTreeMap::new();
        for tx in &self.transactions {
            let entry = months.entry(tx.month_key()).or_default();
            match tx.kind {
                TransactionType::Income => entry.income += tx.amount,
                TransactionType::Expense => entry.expenses += tx.amount,
                TransactionType::Unrecognized(_) => {}
            }
        }
        months
    }

    /// Income and expense per `YYYY-MM`, ascending. Empty months are skipped.
    pub fn monthly_series(&self) -> Vec<MonthlySummary> {
        self.monthly_totals()
            .into_iter()
            .map(|(month, totals)| MonthlySummary {
                month,
                income: totals.income,
                expenses: totals.expenses,
            })
            .collect()
    }

    pub fn totals(&self) -> TransactionStats {
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;
        let mut sum = 0.0;
        for tx in &self.transactions {
            sum += tx.amount;
            match tx.kind {
                TransactionType::Income => total_income += tx.amount,
                TransactionType::Expense => total_expenses += tx.amount,
                TransactionType::Unrecognized(_) => {}
            }
        }

        let count = self.transactions.len();
        let average = if count == 0 { 0.0 } else { sum / count as f64 };

        tracing::debug!(
            transactions = count,
            total_income,
            total_expenses,
            "Computed totals"
        );

        TransactionStats {
            total_income,
            total_expenses,
            net_income: total_income - total_expenses,
            transactions_count: count,
            average_transaction_amount: average,
            category_breakdown: self.category_spend(&TransactionType::Expense),
            monthly_summary: self.monthly_totals(),
        }
    }
}

fn validate(tx: &Transaction) -> Result<()> {
    if !tx.amount.is_finite() {
        return Err(Error::InvalidInput(format!(
            "transaction {} has a non-finite amount",
            tx.id
        )));
    }
    if tx.amount < 0.0 {
        return Err(Error::InvalidInput(format!(
            "transaction {} has a negative amount ({})",
            tx.id, tx.amount
        )));
    }
    if let TransactionType::Unrecognized(raw) = &tx.kind {
        return Err(Error::InvalidInput(format!(
            "transaction {} has unknown type '{}'",
            tx.id, raw
        )));
    }
    Ok(())
}
