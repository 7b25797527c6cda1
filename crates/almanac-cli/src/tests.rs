//! CLI command tests
//!
//! Commands read ledger and holiday files, so fixtures are written to temp dirs.

use std::path::PathBuf;

use almanac_core::test_utils::{budget, date, holiday, LedgerBuilder, USER_ID};
use almanac_core::{EngineConfig, LedgerSnapshot};
use tempfile::TempDir;

use crate::commands::{self, truncate};

struct Fixture {
    _dir: TempDir,
    ledger: PathBuf,
    holidays: PathBuf,
}

/// A year of groceries with a lift before Christmas, plus two budgets
fn setup_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();

    let transactions = LedgerBuilder::new()
        .daily(date(2023, 1, 1), date(2024, 12, 10), "Groceries", 10.0)
        .lift(date(2023, 12, 25), 7, "Groceries", 10.0)
        .income(3000.0, date(2024, 11, 1))
        .transactions();
    let snapshot = LedgerSnapshot {
        user_id: USER_ID,
        transactions,
        budgets: vec![budget(1, "Groceries", 250.0), budget(2, "Dining", 0.0)],
    };
    let ledger = dir.path().join("ledger.json");
    std::fs::write(&ledger, serde_json::to_string(&snapshot).unwrap()).unwrap();

    let events = vec![
        holiday(1, "Christmas", "2023-12-25"),
        holiday(2, "Christmas", "2024-12-25"),
    ];
    let holidays = dir.path().join("holidays.json");
    std::fs::write(&holidays, serde_json::to_string(&events).unwrap()).unwrap();

    Fixture {
        _dir: dir,
        ledger,
        holidays,
    }
}

// ========== Config Tests ==========

#[test]
fn test_load_config_default() {
    let config = commands::load_config(None).unwrap();
    assert_eq!(config.insights.pre_window_days, 7);
}

#[test]
fn test_load_config_missing_file() {
    let result = commands::load_config(Some(std::path::Path::new("/nonexistent/almanac.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("almanac.toml");
    std::fs::write(&path, "[insights]\nwindow_days = 45\n").unwrap();

    let config = commands::load_config(Some(&path)).unwrap();
    assert_eq!(config.insights.window_days, 45);
}

// ========== Stats Command Tests ==========

#[test]
fn test_cmd_stats_all_time() {
    let fx = setup_fixture();
    let result = commands::cmd_stats(&EngineConfig::default(), &fx.ledger, None, None, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_stats_json_range() {
    let fx = setup_fixture();
    let result = commands::cmd_stats(
        &EngineConfig::default(),
        &fx.ledger,
        Some("2024-01-01"),
        Some("2024-03-31"),
        true,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_stats_empty_range() {
    let fx = setup_fixture();
    let result = commands::cmd_stats(
        &EngineConfig::default(),
        &fx.ledger,
        Some("2030-01-01"),
        None,
        false,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_stats_invalid_date() {
    let fx = setup_fixture();
    let result = commands::cmd_stats(&EngineConfig::default(), &fx.ledger, Some("01/02/2024"), None, false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_stats_inverted_range() {
    let fx = setup_fixture();
    let result = commands::cmd_stats(
        &EngineConfig::default(),
        &fx.ledger,
        Some("2024-06-01"),
        Some("2024-01-01"),
        false,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_stats_missing_ledger() {
    let result = commands::cmd_stats(
        &EngineConfig::default(),
        std::path::Path::new("/nonexistent/ledger.json"),
        None,
        None,
        false,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_stats_rejects_negative_amount() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(
        &path,
        r#"{"user_id": 1, "transactions": [
            {"id": 1, "user_id": 1, "amount": -5.0, "category": "Food", "type": "expense", "date": "2024-01-01"}
        ]}"#,
    )
    .unwrap();

    let result = commands::cmd_stats(&EngineConfig::default(), &path, None, None, false);
    assert!(result.is_err());
}

// ========== Budgets Command Tests ==========

#[test]
fn test_cmd_budgets_all_time() {
    let fx = setup_fixture();
    let result = commands::cmd_budgets(&EngineConfig::default(), &fx.ledger, None, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_budgets_current_period_json() {
    let fx = setup_fixture();
    let result = commands::cmd_budgets(&EngineConfig::default(), &fx.ledger, Some("2024-12-05"), true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_budgets_invalid_as_of() {
    let fx = setup_fixture();
    let result = commands::cmd_budgets(&EngineConfig::default(), &fx.ledger, Some("yesterday"), false);
    assert!(result.is_err());
}

// ========== Insights Command Tests ==========

#[test]
fn test_cmd_insights_with_history() {
    let fx = setup_fixture();
    let result = commands::cmd_insights(
        &EngineConfig::default(),
        &fx.ledger,
        Some(&fx.holidays),
        Some("2024-12-10"),
        None,
        None,
        None,
        &[],
        false,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_insights_json_with_overrides() {
    let fx = setup_fixture();
    let result = commands::cmd_insights(
        &EngineConfig::default(),
        &fx.ledger,
        Some(&fx.holidays),
        Some("2024-12-10"),
        Some(20),
        Some(5),
        Some("US"),
        &["christian".to_string()],
        true,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_insights_nothing_upcoming() {
    let fx = setup_fixture();
    let result = commands::cmd_insights(
        &EngineConfig::default(),
        &fx.ledger,
        Some(&fx.holidays),
        Some("2024-06-01"),
        None,
        None,
        None,
        &[],
        false,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_insights_zero_pre_window() {
    let fx = setup_fixture();
    let result = commands::cmd_insights(
        &EngineConfig::default(),
        &fx.ledger,
        Some(&fx.holidays),
        Some("2024-12-10"),
        None,
        Some(0),
        None,
        &[],
        false,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_insights_oversized_window() {
    let fx = setup_fixture();
    let result = commands::cmd_insights(
        &EngineConfig::default(),
        &fx.ledger,
        Some(&fx.holidays),
        Some("2024-12-10"),
        Some(u32::MAX),
        None,
        None,
        &[],
        false,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_insights_missing_holidays_file() {
    let fx = setup_fixture();
    let missing = fx.ledger.with_file_name("missing.json");
    let result = commands::cmd_insights(
        &EngineConfig::default(),
        &fx.ledger,
        Some(&missing),
        Some("2024-12-10"),
        None,
        None,
        None,
        &[],
        false,
    );
    assert!(result.is_err());
}

// ========== Holidays Command Tests ==========

#[test]
fn test_cmd_holidays_curated() {
    let result = commands::cmd_holidays(None, "US", Some("2024-12-01"), Some("2024-12-31"), false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_holidays_from_file_json() {
    let fx = setup_fixture();
    let result = commands::cmd_holidays(Some(&fx.holidays), "us", Some("2023-01-01"), Some("2024-12-31"), true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_holidays_default_range() {
    let result = commands::cmd_holidays(None, "GB", None, None, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_holidays_inverted_range() {
    let result = commands::cmd_holidays(None, "US", Some("2024-12-31"), Some("2024-12-01"), false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_holidays_from_at_end_of_date_range() {
    let result = commands::cmd_holidays(None, "US", Some("+262142-12-25"), None, false);
    assert!(result.is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Entertainment and Leisure", 10), "Enterta...");
    assert_eq!(truncate("abc", 3), "abc");
}

#[test]
fn test_parse_date() {
    assert_eq!(commands::parse_date("2024-02-29", "from").unwrap(), date(2024, 2, 29));
    assert!(commands::parse_date("2023-02-29", "from").is_err());
}
