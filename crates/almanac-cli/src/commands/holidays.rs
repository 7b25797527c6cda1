//! Holiday listing command

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Duration, Utc};

use almanac_core::HolidayEvent;

use super::{load_calendar, parse_optional_date, print_json, truncate};

pub fn cmd_holidays(
    holidays_path: Option<&Path>,
    country: &str,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let from = match parse_optional_date(from, "from")? {
        Some(d) => d,
        None => {
            let today = Utc::now().date_naive();
            today.with_day(1).unwrap_or(today)
        }
    };
    let to = match parse_optional_date(to, "to")? {
        Some(d) => d,
        None => from
            .checked_add_signed(Duration::days(31))
            .ok_or_else(|| anyhow!("--from is out of range"))?,
    };
    if from > to {
        bail!("--from must not be after --to");
    }

    let calendar = load_calendar(holidays_path)?;
    let events: Vec<&HolidayEvent> = calendar.between(country, from, to);

    if json {
        return print_json(&events);
    }

    println!();
    println!("📅 Holidays in {} ({} to {})", country.to_uppercase(), from, to);
    println!("   ─────────────────────────────────────────────────────────────");

    if events.is_empty() {
        println!("   No holidays in this range.");
        return Ok(());
    }

    println!("   {:10} │ {:28} │ {:9} │ Tags", "Date", "Name", "Type");
    println!("   ───────────┼──────────────────────────────┼───────────┼──────────");
    for event in events {
        println!(
            "   {:10} │ {:28} │ {:9} │ {}",
            event.date.to_string(),
            truncate(&event.name, 28),
            event.kind.as_str(),
            event.tags.join(", ")
        );
    }

    Ok(())
}
