//! Holiday calendar and insight handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Duration, Utc};
use serde::Deserialize;

use super::parse_date;
use crate::{AppError, AppState};
use almanac_core::{HolidayCalendar, HolidayEvent, HolidayInsight, InsightRequest, Ledger, Transaction};

/// Query parameters for listing holidays
#[derive(Debug, Deserialize)]
pub struct HolidayQuery {
    /// Country code (default US)
    pub country: Option<String>,
    /// Start date (default first of current month)
    pub from: Option<String>,
    /// End date (default start + 31 days)
    pub to: Option<String>,
}

/// GET /api/holidays - Calendar events for a country and date range
pub async fn list_holidays(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HolidayQuery>,
) -> Result<Json<Vec<HolidayEvent>>, AppError> {
    let country = params.country.as_deref().unwrap_or("US");
    let from = match parse_date(params.from.as_deref(), "from")? {
        Some(d) => d,
        None => {
            let today = Utc::now().date_naive();
            today.with_day(1).unwrap_or(today)
        }
    };
    let to = match parse_date(params.to.as_deref(), "to")? {
        Some(d) => d,
        None => from
            .checked_add_signed(Duration::days(31))
            .ok_or_else(|| AppError::bad_request("from is out of range"))?,
    };
    if from > to {
        return Err(AppError::bad_request("from must not be after to"));
    }

    let events = state
        .calendar
        .between(country, from, to)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(events))
}

/// Request body for holiday insights
#[derive(Debug, Deserialize)]
pub struct HolidayInsightsRequest {
    pub user_id: i64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Holiday set to use instead of the server calendar
    pub holidays: Option<Vec<HolidayEvent>>,
    /// Reference day (default today, UTC)
    pub as_of: Option<String>,
    pub window_days: Option<u32>,
    pub pre_window_days: Option<u32>,
    pub country_code: Option<String>,
    pub culture_tags: Option<Vec<String>>,
    pub calendar_opt_in: Option<bool>,
    /// Recompute even if cached
    pub force: Option<bool>,
}

/// POST /api/insights/holidays - Spend-change predictions for upcoming holidays
pub async fn holiday_insights(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HolidayInsightsRequest>,
) -> Result<Json<Vec<HolidayInsight>>, AppError> {
    let as_of = parse_date(body.as_of.as_deref(), "as_of")?.unwrap_or_else(|| Utc::now().date_naive());

    let mut request = InsightRequest::new(as_of)
        .with_culture_tags(body.culture_tags.unwrap_or_default())
        .with_opt_in(body.calendar_opt_in.unwrap_or(true));
    if let Some(days) = body.window_days {
        request = request.with_window_days(days);
    }
    if let Some(days) = body.pre_window_days {
        request = request.with_pre_window_days(days);
    }
    if let Some(country) = body.country_code {
        request = request.with_country(country);
    }
    if body.force.unwrap_or(false) {
        request = request.forced();
    }

    let ledger = Ledger::new(body.user_id, body.transactions, Vec::new());
    let insights = match body.holidays {
        Some(events) => {
            let calendar = HolidayCalendar::new(events);
            state.engine.holiday_insights(&ledger, &calendar, &request)?
        }
        None => state.engine.holiday_insights(&ledger, &state.calendar, &request)?,
    };

    Ok(Json(insights))
}
