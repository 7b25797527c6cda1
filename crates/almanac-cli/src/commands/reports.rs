//! Totals report

use std::path::Path;

use anyhow::{bail, Result};

use almanac_core::{DateRange, Engine, EngineConfig};

use super::{load_ledger, parse_optional_date, print_json, truncate};

pub fn cmd_stats(
    config: &EngineConfig,
    ledger_path: &Path,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let from = parse_optional_date(from, "from")?;
    let to = parse_optional_date(to, "to")?;
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            bail!("--from must not be after --to");
        }
    }

    let ledger = load_ledger(ledger_path)?;
    let engine = Engine::new(config.clone());
    let stats = engine.totals(&ledger, DateRange::new(from, to))?;

    if json {
        return print_json(&stats);
    }

    println!();
    println!("📊 Transaction Summary (user {})", ledger.user_id());
    match (from, to) {
        (None, None) => println!("   Period: all time"),
        _ => println!(
            "   Period: {} to {}",
            from.map(|d| d.to_string()).unwrap_or_else(|| "start".into()),
            to.map(|d| d.to_string()).unwrap_or_else(|| "now".into())
        ),
    }
    println!("   ─────────────────────────────────────────────");

    if stats.transactions_count == 0 {
        println!("   No transactions found in this period.");
        return Ok(());
    }

    println!("   Income:        {:>12.2}", stats.total_income);
    println!("   Expenses:      {:>12.2}", stats.total_expenses);
    println!("   Net:           {:>12.2}", stats.net_income);
    println!(
        "   Transactions:  {:>12}   (avg {:.2})",
        stats.transactions_count, stats.average_transaction_amount
    );

    if !stats.category_breakdown.is_empty() {
        println!();
        println!("   {:25} │ {:>10} │ {:>6}", "Category", "Spent", "%");
        println!("   ──────────────────────────┼────────────┼────────");
        let mut categories: Vec<(&String, &f64)> = stats.category_breakdown.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (category, amount) in categories {
            let pct = if stats.total_expenses > 0.0 {
                amount / stats.total_expenses * 100.0
            } else {
                0.0
            };
            println!(
                "   {:25} │ {:>10.2} │ {:>5.1}%",
                truncate(category, 25),
                amount,
                pct
            );
        }
    }

    println!();
    println!("   {:8} │ {:>10} │ {:>10}", "Month", "Income", "Expenses");
    println!("   ─────────┼────────────┼────────────");
    for (month, totals) in &stats.monthly_summary {
        println!(
            "   {:8} │ {:>10.2} │ {:>10.2}",
            month, totals.income, totals.expenses
        );
    }

    Ok(())
}
