//! Budget Evaluator - progress ratios and status classification

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::aggregate::Aggregator;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::{Budget, BudgetProgress, BudgetStatus, DateRange, TransactionType};

/// Raw progress at which a budget is near its limit
pub const NEAR_LIMIT_PCT: f64 = 80.0;
/// Raw progress above which a budget is over
pub const OVER_BUDGET_PCT: f64 = 100.0;

/// Classify unclamped progress. Exactly 100% is still `near_limit`.
pub fn classify(raw_progress_pct: f64) -> BudgetStatus {
    if raw_progress_pct > OVER_BUDGET_PCT {
        BudgetStatus::OverBudget
    } else if raw_progress_pct >= NEAR_LIMIT_PCT {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::OnTrack
    }
}

/// Categories that carry more than one budget
pub fn duplicate_categories(budgets: &[Budget]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut dupes = BTreeSet::new();
    for budget in budgets {
        if !seen.insert(budget.category.as_str()) {
            dupes.insert(budget.category.clone());
        }
    }
    dupes.into_iter().collect()
}

/// One progress entry per budget, in input order.
///
/// `expense_spend` is the caller-windowed expense total per category. A
/// malformed budget yields a degraded entry with `error` set and never
/// aborts the batch.
pub fn evaluate(expense_spend: &BTreeMap<String, f64>, budgets: &[Budget]) -> Vec<BudgetProgress> {
    let dupes = duplicate_categories(budgets);
    if !dupes.is_empty() {
        tracing::warn!(categories = ?dupes, "Multiple budgets share a category");
    }

    budgets
        .iter()
        .map(|budget| {
            let spent = expense_spend.get(&budget.category).copied().unwrap_or(0.0);
            evaluate_one(budget, spent).unwrap_or_else(|e| {
                tracing::warn!(budget_id = budget.id, error = %e, "Budget evaluation failed");
                degraded(budget, spent, &e)
            })
        })
        .collect()
}

fn evaluate_one(budget: &Budget, spent: f64) -> Result<BudgetProgress> {
    if !budget.amount.is_finite() || budget.amount <= 0.0 {
        return Err(Error::InvalidBudget {
            budget_id: budget.id,
            reason: format!("amount must be finite and positive, got {}", budget.amount),
        });
    }

    let remaining = budget.amount - spent;
    let raw = spent / budget.amount * 100.0;
    let status = classify(raw);

    Ok(BudgetProgress {
        budget_id: budget.id,
        category: budget.category.clone(),
        period: budget.period,
        amount: budget.amount,
        spent,
        remaining,
        over_by: (status == BudgetStatus::OverBudget).then(|| remaining.abs()),
        progress_pct: raw.clamp(0.0, 100.0),
        raw_progress_pct: raw,
        status,
        error: None,
    })
}

fn degraded(budget: &Budget, spent: f64, err: &Error) -> BudgetProgress {
    BudgetProgress {
        budget_id: budget.id,
        category: budget.category.clone(),
        period: budget.period,
        amount: budget.amount,
        spent,
        remaining: -spent,
        over_by: None,
        progress_pct: 0.0,
        raw_progress_pct: 0.0,
        status: BudgetStatus::OnTrack,
        error: Some(err.to_string()),
    }
}

/// Evaluate the ledger's budgets against all of its transactions
pub fn budget_progress(ledger: &Ledger) -> Result<Vec<BudgetProgress>> {
    let spend = Aggregator::new(ledger, DateRange::all())?.category_spend(&TransactionType::Expense);
    Ok(evaluate(&spend, ledger.budgets()))
}

/// Evaluate each budget against its own period instance containing `as_of`
/// (weekly: Monday..Sunday, monthly: calendar month, yearly: calendar year).
pub fn evaluate_current_period(ledger: &Ledger, as_of: NaiveDate) -> Result<Vec<BudgetProgress>> {
    // Validate once up front so a bad transaction outside every window still fails
    Aggregator::new(ledger, DateRange::all())?;

    let mut by_window: BTreeMap<(Option<NaiveDate>, Option<NaiveDate>), BTreeMap<String, f64>> =
        BTreeMap::new();
    let mut progress = Vec::with_capacity(ledger.budgets().len());

    for budget in ledger.budgets() {
        let window = budget.period.window_containing(as_of);
        let key = (window.from, window.to);
        if !by_window.contains_key(&key) {
            let spend = Aggregator::new(ledger, window)?.category_spend(&TransactionType::Expense);
            tracing::debug!(
                period = budget.period.as_str(),
                from = ?window.from,
                to = ?window.to,
                categories = spend.len(),
                "Windowed budget spend"
            );
            by_window.insert(key, spend);
        }
        let spend = &by_window[&key];
        progress.extend(evaluate(spend, std::slice::from_ref(budget)));
    }

    let dupes = duplicate_categories(ledger.budgets());
    if !dupes.is_empty() {
        tracing::warn!(categories = ?dupes, "Multiple budgets share a category");
    }

    Ok(progress)
}
