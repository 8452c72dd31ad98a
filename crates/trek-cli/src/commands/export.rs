//! CSV export command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::cli::ExportKind;
use trek_core::export::{journey_columns, purchase_columns, write_export};
use trek_core::models::months_back;
use trek_core::{Session, TransportApi};

pub async fn cmd_export(
    api: &TransportApi,
    session: &mut Session,
    kind: ExportKind,
    output: &Path,
    year: i32,
    month: u32,
    back: u32,
) -> Result<()> {
    anyhow::ensure!((1..=12).contains(&month), "Invalid month (use 1-12)");

    let ranges = months_back(year, month, back);
    let batch = api
        .fetch_months(&session.account_id, &ranges)
        .await
        .context("Failed to load transport data. Please try again.")?;
    session.record_fetch(Utc::now());

    let today = Utc::now().date_naive();
    let (path, rows) = match kind {
        ExportKind::Journeys => (
            write_export(output, "journeys", today, &batch.journeys, &journey_columns())?,
            batch.journeys.len(),
        ),
        ExportKind::Purchases => (
            write_export(
                output,
                "transactions",
                today,
                &batch.purchases,
                &purchase_columns(),
            )?,
            batch.purchases.len(),
        ),
    };

    println!("💾 Wrote {} row(s) to {}", rows, path.display());

    Ok(())
}
