//! CSV export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
};
use serde::Deserialize;
use tracing::info;

use super::stats::fetch_error;
use crate::{AppError, AppState};
use trek_core::export::{export_file_name, journey_columns, purchase_columns, to_csv};
use trek_core::models::months_back;

/// Query parameters for CSV export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub account_id: String,
    /// Anchor year of the fetch window (default: 2023, the demo data year)
    pub year: Option<i32>,
    /// Anchor month of the fetch window (default: 7)
    pub month: Option<u32>,
    /// Additional months before the anchor to fetch (default: 2)
    pub months_back: Option<u32>,
}

/// GET /api/export/journeys - Download the fetched journeys as CSV
pub async fn export_journeys(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportQuery>,
) -> Result<Response<Body>, AppError> {
    let batch = fetch_window(&state, &params).await?;
    let csv = to_csv(&batch.journeys, &journey_columns());
    info!("Exported {} journeys to CSV", batch.journeys.len());
    csv_download("journeys", csv)
}

/// GET /api/export/purchases - Download the fetched purchases as CSV
pub async fn export_purchases(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportQuery>,
) -> Result<Response<Body>, AppError> {
    let batch = fetch_window(&state, &params).await?;
    let csv = to_csv(&batch.purchases, &purchase_columns());
    info!("Exported {} purchases to CSV", batch.purchases.len());
    csv_download("transactions", csv)
}

async fn fetch_window(
    state: &AppState,
    params: &ExportQuery,
) -> Result<trek_core::MonthBatch, AppError> {
    let month = params.month.unwrap_or(7);
    if !(1..=12).contains(&month) {
        return Err(AppError::bad_request("Invalid month (use 1-12)"));
    }
    let ranges = months_back(
        params.year.unwrap_or(2023),
        month,
        params.months_back.unwrap_or(2),
    );
    state
        .upstream
        .fetch_months(&params.account_id, &ranges)
        .await
        .map_err(fetch_error)
}

fn csv_download(prefix: &str, csv: String) -> Result<Response<Body>, AppError> {
    let filename = export_file_name(prefix, chrono::Utc::now().date_naive());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}
