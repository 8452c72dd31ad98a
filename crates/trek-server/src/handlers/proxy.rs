//! Upstream proxy handlers
//!
//! Thin per-month proxies in front of the upstream transport-data API. Both
//! unwrap double-encoded envelope bodies and pass the upstream status
//! through; they differ in their error bodies: the journey proxy answers
//! network failure with a fixed 500 body, while the purchases proxy logs
//! upstream errors and echoes status/details back to the caller.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::error;

use crate::AppState;
use trek_core::RecordKind;

/// Query parameters shared by both proxy routes
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub account_id: String,
    pub year: String,
    pub month: String,
}

/// GET /api/journey - Proxy one month of journeys from the upstream API
pub async fn proxy_journeys(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProxyQuery>,
) -> Response {
    match state
        .upstream
        .get_raw(
            RecordKind::Journeys,
            &params.account_id,
            &params.year,
            &params.month,
        )
        .await
    {
        Ok((status, body)) => (passthrough_status(status), Json(body)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Failed to fetch journeys"})),
        )
            .into_response(),
    }
}

/// GET /api/purchases - Proxy one month of purchases from the upstream API
pub async fn proxy_purchases(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProxyQuery>,
) -> Response {
    match state
        .upstream
        .get_raw(
            RecordKind::Purchases,
            &params.account_id,
            &params.year,
            &params.month,
        )
        .await
    {
        Ok((status, body)) if (200..300).contains(&status) => {
            (passthrough_status(status), Json(body)).into_response()
        }
        Ok((status, body)) => {
            error!(status, details = %body, "External API error");
            (
                passthrough_status(status),
                Json(serde_json::json!({
                    "error": "External API error",
                    "status": status,
                    "details": body,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to fetch purchases",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

fn passthrough_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}
