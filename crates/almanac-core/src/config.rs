//! Engine configuration
//!
//! Windows and thresholds for the insight generator plus cache settings.
//! Loaded from TOML with a two-layer resolution:
//! 1. An explicit path (`--config` / `ALMANAC_CONFIG`)
//! 2. The user override at `~/.local/share/almanac/config/almanac.toml`
//! 3. The embedded default shipped with the binary
//!
//! Keys missing from the file keep their built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../config/almanac.toml");

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "ALMANAC_CONFIG";

/// Upper bound for any window length, in days (about ten years)
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Holiday insight windows and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Look-ahead for upcoming holidays, in days
    pub window_days: u32,
    /// Days before a holiday that form its pre-window
    pub pre_window_days: u32,
    /// Trailing reference window for the baseline
    pub baseline_days: u32,
    /// Ignore occurrences older than this many years (0 = no limit)
    pub lookback_years: u32,
    /// Expected change at or below which no adjustment is recommended
    pub min_change_pct: f64,
    pub adjustment_divisor: f64,
    pub max_adjustment_pct: f64,
    /// Max categories reported as drivers
    pub top_categories: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            pre_window_days: 7,
            baseline_days: 90,
            lookback_years: 0,
            min_change_pct: 10.0,
            adjustment_divisor: 2.0,
            max_adjustment_pct: 50.0,
            top_categories: 3,
        }
    }
}

impl InsightConfig {
    /// Oldest day an occurrence may fall on for a holiday dated `holiday`.
    ///
    /// `None` means no limit, including when the limit reaches past the
    /// earliest representable date.
    pub fn lookback_start(&self, holiday: chrono::NaiveDate) -> Option<chrono::NaiveDate> {
        if self.lookback_years == 0 {
            return None;
        }
        let days = 365 * self.lookback_years as i64 + 30;
        holiday.checked_sub_signed(chrono::Duration::days(days))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: 12,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub insights: InsightConfig,
    pub cache: CacheConfig,
}

impl EngineConfig {
    /// Resolve and load the configuration.
    ///
    /// An explicit path must exist; the user override is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                tracing::debug!(path = %path.display(), "Loading config");
                read_config(path)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "Loading config override");
                    read_config(&path)?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Parse TOML, apply over defaults and validate
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(insights) = raw.insights {
            let c = &mut config.insights;
            if let Some(v) = insights.window_days {
                c.window_days = v;
            }
            if let Some(v) = insights.pre_window_days {
                c.pre_window_days = v;
            }
            if let Some(v) = insights.baseline_days {
                c.baseline_days = v;
            }
            if let Some(v) = insights.lookback_years {
                c.lookback_years = v;
            }
            if let Some(v) = insights.min_change_pct {
                c.min_change_pct = v;
            }
            if let Some(v) = insights.adjustment_divisor {
                c.adjustment_divisor = v;
            }
            if let Some(v) = insights.max_adjustment_pct {
                c.max_adjustment_pct = v;
            }
            if let Some(v) = insights.top_categories {
                c.top_categories = v;
            }
        }

        if let Some(cache) = raw.cache {
            if let Some(v) = cache.enabled {
                config.cache.enabled = v;
            }
            if let Some(v) = cache.ttl_hours {
                config.cache.ttl_hours = v;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let i = &self.insights;
        for (name, value) in [
            ("window_days", i.window_days),
            ("pre_window_days", i.pre_window_days),
            ("baseline_days", i.baseline_days),
        ] {
            if value > MAX_WINDOW_DAYS {
                return Err(Error::Config(format!(
                    "insights.{} must be at most {} days",
                    name, MAX_WINDOW_DAYS
                )));
            }
        }
        if i.pre_window_days == 0 {
            return Err(Error::Config("insights.pre_window_days must be at least 1".into()));
        }
        if i.baseline_days == 0 {
            return Err(Error::Config("insights.baseline_days must be at least 1".into()));
        }
        if !(i.adjustment_divisor.is_finite() && i.adjustment_divisor > 0.0) {
            return Err(Error::Config("insights.adjustment_divisor must be positive".into()));
        }
        if !i.min_change_pct.is_finite() || !i.max_adjustment_pct.is_finite() || i.max_adjustment_pct < 0.0 {
            return Err(Error::Config(
                "insights.min_change_pct and max_adjustment_pct must be finite, max non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("almanac").join("config").join("almanac.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Config(format!("Failed to read config: {}", e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    insights: Option<RawInsights>,
    cache: Option<RawCache>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    window_days: Option<u32>,
    pre_window_days: Option<u32>,
    baseline_days: Option<u32>,
    lookback_years: Option<u32>,
    min_change_pct: Option<f64>,
    adjustment_divisor: Option<f64>,
    max_adjustment_pct: Option<f64>,
    top_categories: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawCache {
    enabled: Option<bool>,
    ttl_hours: Option<u64>,
}
