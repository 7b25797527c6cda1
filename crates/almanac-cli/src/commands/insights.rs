//! Holiday insights command

use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use almanac_core::{Engine, EngineConfig, InsightRequest, InsightStatus};

use super::{load_calendar, load_ledger, parse_optional_date, print_json};

#[allow(clippy::too_many_arguments)]
pub fn cmd_insights(
    config: &EngineConfig,
    ledger_path: &Path,
    holidays_path: Option<&Path>,
    as_of: Option<&str>,
    window_days: Option<u32>,
    pre_window_days: Option<u32>,
    country: Option<&str>,
    tags: &[String],
    json: bool,
) -> Result<()> {
    let as_of = parse_optional_date(as_of, "as-of")?.unwrap_or_else(|| Utc::now().date_naive());
    let ledger = load_ledger(ledger_path)?;
    let calendar = load_calendar(holidays_path)?;

    let mut request = InsightRequest::new(as_of).with_culture_tags(tags.to_vec());
    if let Some(days) = window_days {
        request = request.with_window_days(days);
    }
    if let Some(days) = pre_window_days {
        request = request.with_pre_window_days(days);
    }
    if let Some(country) = country {
        request = request.with_country(country);
    }

    let engine = Engine::new(config.clone());
    let insights = engine.holiday_insights(&ledger, &calendar, &request)?;

    if json {
        return print_json(&insights);
    }

    println!();
    println!("🎉 Holiday Insights (as of {})", as_of);
    println!("   ─────────────────────────────────────────────────────────────");

    if insights.is_empty() {
        println!("   No upcoming holidays in the next {} days.",
            window_days.unwrap_or(config.insights.window_days));
        return Ok(());
    }

    for insight in &insights {
        println!();
        println!("   {}  {}", insight.holiday_date, insight.holiday_name);
        match insight.status {
            InsightStatus::Ok => {
                let change = insight.expected_change_pct.unwrap_or(0.0);
                let confidence = insight
                    .confidence
                    .map(|c| c.as_str())
                    .unwrap_or("none");
                println!(
                    "   Expected change: {:+.1}%  (confidence: {}, {} sample(s))",
                    change, confidence, insight.sample_count
                );
                if insight.recommended_adjustment_pct > 0.0 {
                    println!(
                        "   Suggested cut:   {:.0}% between {} and {}",
                        insight.recommended_adjustment_pct,
                        insight.window_start,
                        insight.window_end
                    );
                }
                for top in &insight.top_categories {
                    println!("     • {:20} +{:.2}", top.category, top.delta);
                }
            }
            InsightStatus::InsufficientData => {
                println!("   \x1b[2mNot enough history yet\x1b[0m");
            }
        }
        println!("   {}", insight.explanation);
    }

    Ok(())
}
