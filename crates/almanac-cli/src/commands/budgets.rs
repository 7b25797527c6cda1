//! Budget progress command

use std::path::Path;

use anyhow::Result;

use almanac_core::{BudgetStatus, Engine, EngineConfig};

use super::{load_ledger, parse_optional_date, print_json, truncate};

pub fn cmd_budgets(config: &EngineConfig, ledger_path: &Path, as_of: Option<&str>, json: bool) -> Result<()> {
    let as_of = parse_optional_date(as_of, "as-of")?;
    let ledger = load_ledger(ledger_path)?;
    let engine = Engine::new(config.clone());
    let progress = engine.budget_progress(&ledger, as_of)?;

    if json {
        return print_json(&progress);
    }

    println!();
    println!("💰 Budget Progress (user {})", ledger.user_id());
    match as_of {
        Some(day) => println!("   Current periods as of {}", day),
        None => println!("   All transactions"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if progress.is_empty() {
        println!("   No budgets defined.");
        return Ok(());
    }

    println!(
        "   {:20} │ {:>8} │ {:>10} │ {:>10} │ {:>6} │ Status",
        "Category", "Period", "Budget", "Spent", "%"
    );
    println!("   ─────────────────────┼──────────┼────────────┼────────────┼────────┼────────────");

    for p in &progress {
        let status = match p.status {
            BudgetStatus::OnTrack => "✅ on track",
            BudgetStatus::NearLimit => "⚠️  near limit",
            BudgetStatus::OverBudget => "🔴 over budget",
        };
        println!(
            "   {:20} │ {:>8} │ {:>10.2} │ {:>10.2} │ {:>5.1}% │ {}",
            truncate(&p.category, 20),
            p.period.as_str(),
            p.amount,
            p.spent,
            p.progress_pct,
            status
        );
        if let Some(over) = p.over_by {
            println!("   {:20} │ over by {:.2}", "", over);
        }
        if let Some(err) = &p.error {
            println!("   {:20} │ \x1b[2m{}\x1b[0m", "", err);
        }
    }

    Ok(())
}
