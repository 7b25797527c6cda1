//! Holiday Insight Generator
//!
//! For each upcoming holiday, compares spending in the days leading up to
//! past occurrences of the same holiday against a trailing baseline and
//! turns the average change into a confidence-graded recommendation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::aggregate::Aggregator;
use crate::calendar::HolidayCalendar;
use crate::config::{InsightConfig, MAX_WINDOW_DAYS};
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::{DateRange, HolidayEvent};

use super::types::{Confidence, HolidayInsight, InsightRequest, InsightStatus, TopCategory};
use super::windows::{baseline_window, excluded_days, pre_window, DailyExpenses, WindowSpend};

/// One usable past occurrence
#[derive(Debug, Clone)]
struct Sample {
    pct_change: f64,
    /// Pre-window spend above the baseline expectation, in currency
    delta: f64,
    category_deltas: BTreeMap<String, f64>,
}

impl Sample {
    fn new(pre: &WindowSpend, baseline: &WindowSpend, pre_days: u32) -> Self {
        let n = pre_days as f64;
        let base_daily = baseline.daily();
        let pre_daily = pre.total / n;

        let mut category_deltas = BTreeMap::new();
        let categories: BTreeSet<&String> = pre
            .by_category
            .keys()
            .chain(baseline.by_category.keys())
            .collect();
        for category in categories {
            let actual = pre.by_category.get(category).copied().unwrap_or(0.0);
            let expected = baseline.category_daily(category) * n;
            category_deltas.insert(category.clone(), actual - expected);
        }

        Self {
            pct_change: (pre_daily - base_daily) / base_daily * 100.0,
            delta: pre.total - base_daily * n,
            category_deltas,
        }
    }
}

pub struct HolidayInsightGenerator {
    config: InsightConfig,
}

impl Default for HolidayInsightGenerator {
    fn default() -> Self {
        Self::new(InsightConfig::default())
    }
}

impl HolidayInsightGenerator {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Insights for every upcoming holiday selected by `request`, ordered by
    /// date then name.
    ///
    /// Fails only on malformed ledger data or invalid windows. Holidays
    /// without usable history come back as `insufficient_data`.
    pub fn generate(
        &self,
        ledger: &Ledger,
        calendar: &HolidayCalendar,
        request: &InsightRequest,
    ) -> Result<Vec<HolidayInsight>> {
        if !request.calendar_opt_in {
            tracing::debug!(user_id = ledger.user_id(), "Calendar insights disabled for user");
            return Ok(Vec::new());
        }

        Aggregator::new(ledger, DateRange::all())?;

        let window_days = request.window_days.unwrap_or(self.config.window_days);
        let pre_days = request.pre_window_days.unwrap_or(self.config.pre_window_days);
        if pre_days == 0 {
            return Err(Error::InvalidInput("pre_window_days must be at least 1".into()));
        }
        for (name, value) in [("window_days", window_days), ("pre_window_days", pre_days)] {
            if value > MAX_WINDOW_DAYS {
                return Err(Error::InvalidInput(format!(
                    "{} must be at most {} days, got {}",
                    name, MAX_WINDOW_DAYS, value
                )));
            }
        }

        let mut upcoming =
            calendar.upcoming(request.country_code.as_deref(), request.as_of, window_days);
        if !request.culture_tags.is_empty() {
            upcoming.retain(|e| e.has_any_tag(&request.culture_tags));
        }

        let daily = DailyExpenses::from_ledger(ledger);
        let mut excluded_by_country: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        let mut insights = Vec::with_capacity(upcoming.len());

        for event in upcoming {
            let country = event.country_code.to_uppercase();
            let excluded = excluded_by_country.entry(country.clone()).or_insert_with(|| {
                excluded_days(
                    calendar
                        .events()
                        .iter()
                        .filter(|e| e.country_code.eq_ignore_ascii_case(&country)),
                    pre_days,
                )
            });

            let insight = match self.analyze(event, calendar, &daily, excluded, pre_days, request.as_of) {
                Ok(insight) => insight,
                Err(Error::InsufficientHistory { holiday, usable }) => {
                    tracing::debug!(holiday = %holiday, usable, "Not enough history for holiday");
                    self.insufficient(event, pre_days, usable)
                }
                Err(e) => return Err(e),
            };
            insights.push(insight);
        }

        insights.sort_by(|a, b| {
            a.holiday_date
                .cmp(&b.holiday_date)
                .then_with(|| a.holiday_name.cmp(&b.holiday_name))
        });

        tracing::debug!(
            user_id = ledger.user_id(),
            as_of = %request.as_of,
            count = insights.len(),
            "Holiday insights generated"
        );

        Ok(insights)
    }

    fn analyze(
        &self,
        event: &HolidayEvent,
        calendar: &HolidayCalendar,
        daily: &DailyExpenses,
        excluded: &BTreeSet<NaiveDate>,
        pre_days: u32,
        as_of: NaiveDate,
    ) -> Result<HolidayInsight> {
        let mut samples = Vec::new();
        let none = BTreeSet::new();

        for occurrence in calendar.occurrences_before(event, self.config.lookback_start(event.date)) {
            if occurrence.date > as_of {
                continue;
            }
            let pre = pre_window(occurrence.date, pre_days);
            if !daily.covers(pre) {
                tracing::debug!(holiday = %occurrence.name, date = %occurrence.date, "Occurrence predates ledger history");
                continue;
            }
            let baseline_range = baseline_window(occurrence.date, pre_days, self.config.baseline_days);
            let baseline = daily.sum(baseline_range, excluded);
            if baseline.daily() <= 0.0 {
                tracing::debug!(holiday = %occurrence.name, date = %occurrence.date, "Zero baseline, occurrence skipped");
                continue;
            }
            let pre_spend = daily.sum(pre, &none);
            samples.push(Sample::new(&pre_spend, &baseline, pre_days));
        }

        if samples.is_empty() {
            return Err(Error::InsufficientHistory {
                holiday: event.name.clone(),
                usable: 0,
            });
        }

        let k = samples.len();
        let mean_pct = samples.iter().map(|s| s.pct_change).sum::<f64>() / k as f64;
        let mean_delta = samples.iter().map(|s| s.delta).sum::<f64>() / k as f64;
        let expected = round_to(mean_pct, 1);
        let top = self.top_categories(&samples);
        let window = pre_window(event.date, pre_days);

        Ok(HolidayInsight {
            holiday_event_id: event.id,
            holiday_name: event.name.clone(),
            holiday_date: event.date,
            status: InsightStatus::Ok,
            expected_change_pct: Some(expected),
            confidence: Confidence::from_sample_count(k),
            recommended_adjustment_pct: self.recommended_adjustment(expected),
            explanation: explain(&event.name, k, expected, mean_delta, &top),
            sample_count: k,
            window_start: window.from.unwrap_or(event.date),
            window_end: window.to.unwrap_or(event.date),
            top_categories: top,
        })
    }

    /// 0 up to the minimum change, else half the change capped at the maximum
    pub fn recommended_adjustment(&self, expected_change_pct: f64) -> f64 {
        if expected_change_pct <= self.config.min_change_pct {
            return 0.0;
        }
        (expected_change_pct / self.config.adjustment_divisor)
            .round()
            .min(self.config.max_adjustment_pct)
    }

    fn top_categories(&self, samples: &[Sample]) -> Vec<TopCategory> {
        let k = samples.len() as f64;
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for sample in samples {
            for (category, delta) in &sample.category_deltas {
                *totals.entry(category.as_str()).or_insert(0.0) += delta;
            }
        }

        let mut ranked: Vec<TopCategory> = totals
            .into_iter()
            .map(|(category, total)| TopCategory {
                category: category.to_string(),
                delta: round_to(total / k, 2),
            })
            .filter(|c| c.delta > 0.0)
            .collect();
        ranked.sort_by(|a, b| {
            b.delta
                .total_cmp(&a.delta)
                .then_with(|| a.category.cmp(&b.category))
        });
        ranked.truncate(self.config.top_categories);
        ranked
    }

    fn insufficient(&self, event: &HolidayEvent, pre_days: u32, usable: usize) -> HolidayInsight {
        let window = pre_window(event.date, pre_days);
        HolidayInsight {
            holiday_event_id: event.id,
            holiday_name: event.name.clone(),
            holiday_date: event.date,
            status: InsightStatus::InsufficientData,
            expected_change_pct: None,
            confidence: None,
            recommended_adjustment_pct: 0.0,
            explanation: format!(
                "There are not enough historical occurrences of {} in your transactions yet. \
                 Add more history to unlock a personalized estimate.",
                event.name
            ),
            sample_count: usable,
            window_start: window.from.unwrap_or(event.date),
            window_end: window.to.unwrap_or(event.date),
            top_categories: Vec::new(),
        }
    }
}

fn explain(name: &str, k: usize, pct: f64, delta: f64, top: &[TopCategory]) -> String {
    let sign = if pct >= 0.0 { "+" } else { "" };
    let periods = if k == 1 { "period" } else { "periods" };
    let direction = if delta >= 0.0 { "more" } else { "less" };
    let categories = if top.is_empty() {
        "your usual categories".to_string()
    } else {
        top.iter()
            .map(|c| c.category.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Based on your last {} {} {}, spending changed {}{:.1}% (about {:.0} {} than usual), mostly in {}.",
        k,
        name,
        periods,
        sign,
        pct,
        delta.abs(),
        direction,
        categories
    )
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
