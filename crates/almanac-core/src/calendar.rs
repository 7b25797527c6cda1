//! Holiday calendar - read-only reference set of dated events

use std::path::Path;

use chrono::{Duration, NaiveDate};
use sha2::{Digest, Sha256};

use crate::models::HolidayEvent;
use crate::Result;

/// Curated seed shipped with the binary
const CURATED_HOLIDAYS: &str = include_str!("../../../data/holidays.json");

/// Owned set of holiday events, kept sorted by date then name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayCalendar {
    events: Vec<HolidayEvent>,
}

impl HolidayCalendar {
    pub fn new(mut events: Vec<HolidayEvent>) -> Self {
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { events }
    }

    /// The embedded curated calendar
    pub fn curated() -> Result<Self> {
        Self::from_json_str(CURATED_HOLIDAYS)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let events: Vec<HolidayEvent> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    /// Load a JSON array of holiday events
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let calendar = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), events = calendar.len(), "Loaded holiday calendar");
        Ok(calendar)
    }

    pub fn events(&self) -> &[HolidayEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events for `country` dated `from..=to`, ascending
    pub fn between(&self, country: &str, from: NaiveDate, to: NaiveDate) -> Vec<&HolidayEvent> {
        self.events
            .iter()
            .filter(|e| e.country_code.eq_ignore_ascii_case(country))
            .filter(|e| e.date >= from && e.date <= to)
            .collect()
    }

    /// Events dated `as_of..=as_of + window_days`, optionally for one country
    pub fn upcoming(&self, country: Option<&str>, as_of: NaiveDate, window_days: u32) -> Vec<&HolidayEvent> {
        let end = as_of
            .checked_add_signed(Duration::days(window_days as i64))
            .unwrap_or(NaiveDate::MAX);
        self.events
            .iter()
            .filter(|e| country.map_or(true, |c| e.country_code.eq_ignore_ascii_case(c)))
            .filter(|e| e.date >= as_of && e.date <= end)
            .collect()
    }

    /// Earlier occurrences of the same holiday, newest first.
    ///
    /// `earliest` bounds how far back to look (inclusive).
    pub fn occurrences_before(&self, event: &HolidayEvent, earliest: Option<NaiveDate>) -> Vec<&HolidayEvent> {
        let mut found: Vec<&HolidayEvent> = self
            .events
            .iter()
            .filter(|e| e.date < event.date)
            .filter(|e| earliest.map_or(true, |d| e.date >= d))
            .filter(|e| e.is_occurrence_of(event))
            .collect();
        found.reverse();
        found
    }

    /// Content fingerprint of the set, used as the holiday-set version
    pub fn version(&self) -> String {
        let mut hasher = Sha256::new();
        for e in &self.events {
            hasher.update(e.id.to_le_bytes());
            hasher.update(e.country_code.as_bytes());
            hasher.update([0]);
            hasher.update(e.name.as_bytes());
            hasher.update([0]);
            hasher.update(e.date.to_string().as_bytes());
            for tag in &e.tags {
                hasher.update(tag.as_bytes());
                hasher.update([1]);
            }
            hasher.update([0]);
        }
        hex::encode(&hasher.finalize()[..8])
    }
}
