//! Insight cache keyed per user, window and holiday-set version

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::config::CacheConfig;

use super::types::HolidayInsight;

/// Everything an insight list depends on besides the ledger content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user_id: i64,
    pub as_of: NaiveDate,
    pub window_days: u32,
    pub pre_window_days: u32,
    pub holiday_set_version: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    ledger_fingerprint: String,
    stored_at: Instant,
    insights: Vec<HolidayInsight>,
}

/// Thread-safe store of computed insight lists.
///
/// Entries remember the ledger fingerprint they were computed from. Seeing a
/// different fingerprint for a user means their data changed, so all of that
/// user's entries are dropped.
#[derive(Debug)]
pub struct InsightCache {
    enabled: bool,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl Default for InsightCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl InsightCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            ttl: config.ttl(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached insights for `key`, if fresh and computed from the same ledger
    pub fn get(&self, key: &CacheKey, ledger_fingerprint: &str) -> Option<Vec<HolidayInsight>> {
        if !self.enabled {
            return None;
        }

        let stale = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.ledger_fingerprint != ledger_fingerprint => Staleness::Mutated,
                Some(entry) if entry.stored_at.elapsed() >= self.ttl => Staleness::Expired,
                Some(entry) => {
                    tracing::debug!(user_id = key.user_id, as_of = %key.as_of, "Insight cache hit");
                    return Some(entry.insights.clone());
                }
            }
        };

        match stale {
            Staleness::Mutated => {
                let dropped = self.invalidate_user(key.user_id);
                tracing::debug!(user_id = key.user_id, dropped, "Ledger changed, insight cache invalidated");
            }
            Staleness::Expired => {
                self.entries
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(key);
                tracing::debug!(user_id = key.user_id, "Insight cache entry expired");
            }
        }
        None
    }

    pub fn insert(&self, key: CacheKey, ledger_fingerprint: String, insights: Vec<HolidayInsight>) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // A new fingerprint supersedes everything cached for the user
        entries.retain(|k, e| k.user_id != key.user_id || e.ledger_fingerprint == ledger_fingerprint);
        entries.insert(
            key,
            CacheEntry {
                ledger_fingerprint,
                stored_at: Instant::now(),
                insights,
            },
        );
    }

    /// Drop every entry for `user_id`, returning how many were removed
    pub fn invalidate_user(&self, user_id: i64) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|k, _| k.user_id != user_id);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum Staleness {
    Mutated,
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    fn key(user_id: i64, as_of: NaiveDate) -> CacheKey {
        CacheKey {
            user_id,
            as_of,
            window_days: 30,
            pre_window_days: 7,
            holiday_set_version: "v1".into(),
        }
    }

    #[test]
    fn test_hit_requires_same_fingerprint() {
        let cache = InsightCache::default();
        let k = key(1, date(2024, 12, 1));
        cache.insert(k.clone(), "aaa".into(), vec![]);

        assert_eq!(cache.get(&k, "aaa"), Some(vec![]));
        assert_eq!(cache.get(&k, "bbb"), None);
        // The mismatch invalidated the user
        assert_eq!(cache.get(&k, "aaa"), None);
    }

    #[test]
    fn test_mutation_drops_all_user_entries() {
        let cache = InsightCache::default();
        cache.insert(key(1, date(2024, 12, 1)), "aaa".into(), vec![]);
        cache.insert(key(1, date(2024, 12, 2)), "aaa".into(), vec![]);
        cache.insert(key(2, date(2024, 12, 1)), "zzz".into(), vec![]);
        assert_eq!(cache.len(), 3);

        cache.insert(key(1, date(2024, 12, 3)), "bbb".into(), vec![]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(2, date(2024, 12, 1)), "zzz").is_some());
    }

    #[test]
    fn test_invalidate_user() {
        let cache = InsightCache::default();
        cache.insert(key(1, date(2024, 12, 1)), "aaa".into(), vec![]);
        cache.insert(key(2, date(2024, 12, 1)), "bbb".into(), vec![]);

        assert_eq!(cache.invalidate_user(1), 1);
        assert_eq!(cache.invalidate_user(1), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = InsightCache::new(&CacheConfig {
            enabled: true,
            ttl_hours: 0,
        });
        let k = key(1, date(2024, 12, 1));
        cache.insert(k.clone(), "aaa".into(), vec![]);
        assert_eq!(cache.get(&k, "aaa"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = InsightCache::new(&CacheConfig {
            enabled: false,
            ttl_hours: 12,
        });
        let k = key(1, date(2024, 12, 1));
        cache.insert(k.clone(), "aaa".into(), vec![]);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&k, "aaa"), None);
    }
}
