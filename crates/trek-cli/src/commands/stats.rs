//! Monthly stats command

use anyhow::{Context, Result};
use chrono::Utc;

use trek_core::aggregate::monthly_summary;
use trek_core::demo::find_account;
use trek_core::format::{format_currency, mode_icon, mode_label, PLACEHOLDER};
use trek_core::models::months_back;
use trek_core::{Session, TransportApi};

pub async fn cmd_stats(
    api: &TransportApi,
    session: &mut Session,
    year: i32,
    month: u32,
    back: u32,
    target_month: Option<&str>,
) -> Result<()> {
    anyhow::ensure!((1..=12).contains(&month), "Invalid month (use 1-12)");

    let ranges = months_back(year, month, back);

    // All-or-nothing: one failed range fails the whole window, surfaced as a
    // single banner. Retrying is manual.
    let batch = api
        .fetch_months(&session.account_id, &ranges)
        .await
        .context("Failed to load transport data. Please try again.")?;
    session.record_fetch(Utc::now());

    let summary = monthly_summary(&batch.journeys, &batch.purchases, target_month);
    let stats = &summary.stats;

    let title = match find_account(&session.account_id) {
        Some(account) => format!("{} {}", account.avatar, account.name),
        None => session.account_id.clone(),
    };
    let scope = target_month.unwrap_or("all fetched months");

    println!("📊 {} — {}", title, scope);
    println!();
    println!("   Journeys:      {}", stats.journeys);
    println!(
        "   Total spend:   {}",
        format_currency(stats.total_spend, "GBP")
    );
    println!("   Top operator:  {}", stats.top_operator);
    println!("   CO₂ estimate:  {:.1} kg", stats.total_co2_g / 1000.0);
    println!();
    println!(
        "   Average journey cost: {}",
        summary
            .average_cost
            .map(|cost| format_currency(cost.round() as i64, "GBP"))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    );
    println!(
        "   Most used transport:  {}",
        summary
            .top_mode
            .as_deref()
            .map(|mode| format!("{} {}", mode_icon(mode), mode_label(mode)))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    );
    println!(
        "   Total distance:       {:.2} km",
        summary.total_distance_km
    );

    Ok(())
}
