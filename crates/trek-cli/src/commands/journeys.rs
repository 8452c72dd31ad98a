//! Journey table command

use anyhow::Result;
use chrono::Utc;
use tracing::debug;

use trek_core::format::{format_date, format_metric, mode_icon, mode_label};
use trek_core::models::months_back;
use trek_core::{Session, TransportApi};

pub async fn cmd_journeys(
    api: &TransportApi,
    session: &mut Session,
    year: i32,
    month: u32,
    back: u32,
) -> Result<()> {
    anyhow::ensure!((1..=12).contains(&month), "Invalid month (use 1-12)");

    let ranges = months_back(year, month, back);
    println!(
        "🧭 Fetching journeys for {} ({} month window)...",
        session.account_id,
        ranges.len()
    );

    let report = api.fetch_months_partial(&session.account_id, &ranges).await;

    // Failed ranges are reported but do not hide the months that loaded
    let failures = report.failures();
    for (range, message) in &failures {
        eprintln!("⚠️  {}: {}", range, message);
    }
    if !failures.is_empty() {
        eprintln!("   Showing partial data. Run the command again to retry.");
    }

    let batch = report.into_batch();
    session.record_fetch(Utc::now());
    debug!(
        journeys = batch.journeys.len(),
        purchases = batch.purchases.len(),
        "fetched month window"
    );

    if batch.journeys.is_empty() {
        println!("No journeys found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<12} {:<10} {:<22} {:>14} {:>12}  {}",
        "Date", "Mode", "Operator", "Distance", "CO₂", "Journey ID"
    );
    for journey in &batch.journeys {
        println!(
            "{:<12} {} {:<7} {:<22} {:>14} {:>12}  {}",
            format_date(journey.travel_date.as_deref()),
            mode_icon(&journey.mode),
            mode_label(&journey.mode),
            journey.operator.display(),
            format_metric(&journey.distance_km, "km"),
            format_metric(&journey.co2_g, "g"),
            journey
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "—".to_string()),
        );
    }
    println!();
    println!("{} journey(s)", batch.journeys.len());

    Ok(())
}
