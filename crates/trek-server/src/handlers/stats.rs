//! Monthly stats handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use trek_core::models::{months_back, MonthlySummary};
use trek_core::{aggregate, Error};

/// Query parameters for the stats report
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub account_id: String,
    /// Anchor year of the fetch window (default: 2023, the demo data year)
    pub year: Option<i32>,
    /// Anchor month of the fetch window (default: 7)
    pub month: Option<u32>,
    /// Additional months before the anchor to fetch (default: 2)
    pub months_back: Option<u32>,
    /// "YYYY-MM" prefix restricting aggregation to one calendar month
    pub target_month: Option<String>,
}

/// GET /api/stats - Fetch a month window and aggregate it into a summary
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let month = params.month.unwrap_or(7);
    if !(1..=12).contains(&month) {
        return Err(AppError::bad_request("Invalid month (use 1-12)"));
    }

    let ranges = months_back(
        params.year.unwrap_or(2023),
        month,
        params.months_back.unwrap_or(2),
    );

    let batch = state
        .upstream
        .fetch_months(&params.account_id, &ranges)
        .await
        .map_err(fetch_error)?;

    let summary = aggregate::monthly_summary(
        &batch.journeys,
        &batch.purchases,
        params.target_month.as_deref(),
    );
    Ok(Json(summary))
}

/// Map a failed fetch to a response: upstream rejections become 502s, the
/// rest are sanitized internal errors.
pub(crate) fn fetch_error(err: Error) -> AppError {
    match err {
        Error::Upstream { status, .. } => {
            AppError::bad_gateway(&format!("Upstream API error (status {})", status))
        }
        other => AppError::from(other),
    }
}
