//! Monthly aggregation
//!
//! Reduces canonical journey/purchase records into the statistics shown by
//! the dashboard stat cards and quick-stats panel. Month filtering is a
//! string-prefix comparison on the ISO date fields, so malformed or missing
//! dates are silently excluded rather than throwing. Non-numeric amounts,
//! CO2 and distance values contribute zero.

use crate::models::{Journey, MonthlyStats, MonthlySummary, Purchase};

/// Compute the stat-card figures for one month.
///
/// `target_month` is a zero-padded `"YYYY-MM"` prefix; when `None`, all
/// records are included.
pub fn monthly_stats(
    journeys: &[Journey],
    purchases: &[Purchase],
    target_month: Option<&str>,
) -> MonthlyStats {
    let journeys = filter_journeys(journeys, target_month);
    let purchases = filter_purchases(purchases, target_month);

    let total_spend: f64 = purchases
        .iter()
        .filter_map(|p| p.transaction.price.amount.known())
        .sum();

    let total_co2_g: f64 = journeys.iter().filter_map(|j| j.co2_g.known()).sum();

    let top_operator = top_count(purchases.iter().map(|p| p.operator.display()))
        .unwrap_or_else(|| "None".to_string());

    MonthlyStats {
        journeys: journeys.len(),
        total_spend: total_spend.round() as i64,
        top_operator,
        total_co2_g,
    }
}

/// Compute the extended summary: stat cards plus average cost, most-used
/// mode and total distance, all over the same filtered record sets.
pub fn monthly_summary(
    journeys: &[Journey],
    purchases: &[Purchase],
    target_month: Option<&str>,
) -> MonthlySummary {
    let stats = monthly_stats(journeys, purchases, target_month);
    let filtered = filter_journeys(journeys, target_month);

    let average_cost = if stats.journeys > 0 {
        Some(stats.total_spend as f64 / stats.journeys as f64)
    } else {
        None
    };

    let top_mode = top_count(filtered.iter().map(|j| j.mode.as_str()));

    let total_distance_km: f64 = filtered.iter().filter_map(|j| j.distance_km.known()).sum();

    MonthlySummary {
        stats,
        average_cost,
        top_mode,
        total_distance_km,
    }
}

fn filter_journeys<'a>(journeys: &'a [Journey], target_month: Option<&str>) -> Vec<&'a Journey> {
    journeys
        .iter()
        .filter(|j| matches_month(j.travel_date.as_deref(), target_month))
        .collect()
}

fn filter_purchases<'a>(
    purchases: &'a [Purchase],
    target_month: Option<&str>,
) -> Vec<&'a Purchase> {
    purchases
        .iter()
        .filter(|p| matches_month(p.transaction.date_time.as_deref(), target_month))
        .collect()
}

fn matches_month(date: Option<&str>, target_month: Option<&str>) -> bool {
    match target_month {
        Some(prefix) => date.map(|d| d.starts_with(prefix)).unwrap_or(false),
        None => true,
    }
}

/// Most frequent key under a left-to-right count; ties broken by first
/// encounter. `None` when the iterator is empty.
fn top_count<'a>(keys: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    // counts preserves first-encounter order; a strict comparison keeps the
    // earliest key on ties
    let mut best: Option<(&str, usize)> = None;
    for (key, n) in counts {
        match best {
            Some((_, best_n)) if n <= best_n => {}
            _ => best = Some((key, n)),
        }
    }
    best.map(|(key, _)| key.to_string())
}
