//! Health and aggregation handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::parse_date;
use crate::{AppError, AppState};
use almanac_core::{DateRange, Ledger, Transaction, TransactionStats};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Request body for transaction stats
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub user_id: i64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Inclusive start (YYYY-MM-DD)
    pub from: Option<String>,
    /// Inclusive end (YYYY-MM-DD)
    pub to: Option<String>,
}

/// POST /api/stats/transactions - Totals, category breakdown and monthly summary
pub async fn transaction_stats(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StatsRequest>,
) -> Result<Json<TransactionStats>, AppError> {
    let from = parse_date(body.from.as_deref(), "from")?;
    let to = parse_date(body.to.as_deref(), "to")?;
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(AppError::bad_request("from must not be after to"));
        }
    }

    let ledger = Ledger::new(body.user_id, body.transactions, Vec::new());
    let stats = state.engine.totals(&ledger, DateRange::new(from, to))?;

    Ok(Json(stats))
}
