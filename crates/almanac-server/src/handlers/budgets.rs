//! Budget handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use super::parse_date;
use crate::{AppError, AppState};
use almanac_core::{Budget, BudgetProgress, Ledger, Transaction};

/// Request body for budget progress
#[derive(Debug, Deserialize)]
pub struct BudgetProgressRequest {
    pub user_id: i64,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Evaluate each budget over its period containing this day (YYYY-MM-DD).
    /// Without it all transactions count.
    pub as_of: Option<String>,
}

/// POST /api/budgets/progress - Progress and status per budget, in input order
pub async fn budget_progress(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BudgetProgressRequest>,
) -> Result<Json<Vec<BudgetProgress>>, AppError> {
    let as_of = parse_date(body.as_of.as_deref(), "as_of")?;
    let ledger = Ledger::new(body.user_id, body.transactions, body.budgets);

    let progress = state.engine.budget_progress(&ledger, as_of)?;

    Ok(Json(progress))
}
