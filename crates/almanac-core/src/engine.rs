//! Engine - the entry point the surfaces call
//!
//! Bundles configuration, the insight generator and the insight cache behind
//! the three exposed computations.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::Aggregator;
use crate::budget;
use crate::calendar::HolidayCalendar;
use crate::config::EngineConfig;
use crate::insights::{CacheKey, HolidayInsight, HolidayInsightGenerator, InsightCache, InsightRequest};
use crate::ledger::Ledger;
use crate::models::{BudgetProgress, DateRange, MonthlySummary, TransactionStats, TransactionType};
use crate::Result;

pub struct Engine {
    config: EngineConfig,
    generator: HolidayInsightGenerator,
    cache: InsightCache,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            generator: HolidayInsightGenerator::new(config.insights.clone()),
            cache: InsightCache::new(&config.cache),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &InsightCache {
        &self.cache
    }

    /// Summary totals, category breakdown and monthly summary over `range`
    pub fn totals(&self, ledger: &Ledger, range: DateRange) -> Result<TransactionStats> {
        Ok(Aggregator::new(ledger, range)?.totals())
    }

    pub fn category_spend(
        &self,
        ledger: &Ledger,
        range: DateRange,
        kind: &TransactionType,
    ) -> Result<BTreeMap<String, f64>> {
        Ok(Aggregator::new(ledger, range)?.category_spend(kind))
    }

    pub fn monthly_series(&self, ledger: &Ledger, range: DateRange) -> Result<Vec<MonthlySummary>> {
        Ok(Aggregator::new(ledger, range)?.monthly_series())
    }

    /// Budget progress in budget order.
    ///
    /// With `as_of`, each budget only sees its own current period; without
    /// it, the whole ledger counts.
    pub fn budget_progress(&self, ledger: &Ledger, as_of: Option<NaiveDate>) -> Result<Vec<BudgetProgress>> {
        match as_of {
            Some(day) => budget::evaluate_current_period(ledger, day),
            None => budget::budget_progress(ledger),
        }
    }

    /// Holiday insights, served from the cache when the ledger is unchanged
    pub fn holiday_insights(
        &self,
        ledger: &Ledger,
        calendar: &HolidayCalendar,
        request: &InsightRequest,
    ) -> Result<Vec<HolidayInsight>> {
        if !request.calendar_opt_in {
            return self.generator.generate(ledger, calendar, request);
        }

        let key = CacheKey {
            user_id: ledger.user_id(),
            as_of: request.as_of,
            window_days: request.window_days.unwrap_or(self.config.insights.window_days),
            pre_window_days: request
                .pre_window_days
                .unwrap_or(self.config.insights.pre_window_days),
            holiday_set_version: self.calendar_version(calendar, request),
        };
        let fingerprint = ledger.fingerprint();

        if !request.force {
            if let Some(hit) = self.cache.get(&key, &fingerprint) {
                return Ok(hit);
            }
        }

        let insights = self.generator.generate(ledger, calendar, request)?;
        self.cache.insert(key, fingerprint, insights.clone());
        Ok(insights)
    }

    /// Drop cached results for a user after their data changed
    pub fn invalidate_user(&self, user_id: i64) -> usize {
        let dropped = self.cache.invalidate_user(user_id);
        tracing::info!(user_id, dropped, "Invalidated cached insights");
        dropped
    }

    // Filters change the result as much as the holiday set does
    fn calendar_version(&self, calendar: &HolidayCalendar, request: &InsightRequest) -> String {
        let mut version = calendar.version();
        if let Some(country) = &request.country_code {
            version.push(':');
            version.push_str(&country.to_uppercase());
        }
        if !request.culture_tags.is_empty() {
            let mut tags: Vec<String> = request.culture_tags.iter().map(|t| t.to_lowercase()).collect();
            tags.sort();
            version.push('#');
            version.push_str(&tags.join(","));
        }
        version
    }
}
