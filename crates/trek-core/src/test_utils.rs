//! Test utilities for trek-core
//!
//! This module provides testing infrastructure including a mock upstream
//! transport-data API that serves deterministic journey/purchase records per
//! month, with optional envelope encoding and failure injection.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Behavior switches for the mock upstream
#[derive(Debug, Clone)]
pub struct MockUpstreamOptions {
    /// Wrap every response as `{"statusCode": ..., "body": "<json string>"}`
    pub envelope: bool,
    /// With `envelope`, make the inner body unparseable
    pub malformed_envelope: bool,
    /// Month values (as requested, e.g. "6") that return a 500
    pub fail_months: Vec<String>,
    /// Journey records served per month
    pub journeys_per_month: usize,
    /// Purchase records served per month
    pub purchases_per_month: usize,
}

impl Default for MockUpstreamOptions {
    fn default() -> Self {
        Self {
            envelope: false,
            malformed_envelope: false,
            fail_months: Vec::new(),
            journeys_per_month: 2,
            purchases_per_month: 2,
        }
    }
}

/// Mock upstream transport API for integration tests
pub struct MockTransportServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTransportServer {
    /// Start with default behavior on an available port
    pub async fn start() -> Self {
        Self::start_with(MockUpstreamOptions::default()).await
    }

    /// Start with custom behavior
    pub async fn start_with(options: MockUpstreamOptions) -> Self {
        let state = Arc::new(options);
        let app = Router::new()
            .route("/journeys", get(handle_journeys))
            .route("/purchases", get(handle_purchases))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockTransportServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_journeys(
    State(options): State<Arc<MockUpstreamOptions>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (account, year, month) = request_params(&params);
    if options.fail_months.contains(&month) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"})))
            .into_response();
    }
    respond(&options, journey_records(&account, &year, &month, options.journeys_per_month))
}

async fn handle_purchases(
    State(options): State<Arc<MockUpstreamOptions>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (account, year, month) = request_params(&params);
    if options.fail_months.contains(&month) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"})))
            .into_response();
    }
    respond(&options, purchase_records(&account, &year, &month, options.purchases_per_month))
}

fn request_params(params: &HashMap<String, String>) -> (String, String, String) {
    let get = |key: &str| params.get(key).cloned().unwrap_or_default();
    (get("account_id"), get("year"), get("month"))
}

fn respond(options: &MockUpstreamOptions, records: Value) -> Response {
    if options.envelope {
        let body = if options.malformed_envelope {
            "not { json".to_string()
        } else {
            records.to_string()
        };
        return Json(json!({"statusCode": 200, "body": body})).into_response();
    }
    Json(records).into_response()
}

fn month_padded(month: &str) -> String {
    match month.trim().parse::<u32>() {
        Ok(m) => format!("{:02}", m),
        Err(_) => month.to_string(),
    }
}

/// Deterministic journeys for one (account, year, month)
pub fn journey_records(account: &str, year: &str, month: &str, count: usize) -> Value {
    let mm = month_padded(month);
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("j-{}-{}-{}", year, mm, i + 1),
                "account_id": account,
                "travel_date": format!("{}-{}-{:02}", year, mm, i + 1),
                "mode": {"id": if i % 2 == 0 { "bus" } else { "train" }},
                "operator": if i % 2 == 0 {
                    json!({"id": "op-a", "name": "Arriva"})
                } else {
                    json!({"id": "op-b", "name": "Brightline"})
                },
                "distance_km": if i % 2 == 0 { json!(5.5) } else { json!("unknown") },
                "co2_g": if i % 2 == 0 { json!(120.0) } else { json!(null) },
                "polyline": null,
            })
        })
        .collect();
    Value::Array(records)
}

/// Deterministic purchases for one (account, year, month)
pub fn purchase_records(_account: &str, year: &str, month: &str, count: usize) -> Value {
    let mm = month_padded(month);
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("p-{}-{}-{}", year, mm, i + 1),
                "mode": {"id": if i % 2 == 0 { "bus" } else { "train" }},
                "operator": if i % 2 == 0 {
                    json!({"id": "op-a", "name": "Arriva"})
                } else {
                    json!({"id": "op-b"})
                },
                "booking-date-time": format!("{}-{}-{:02}T08:00:00Z", year, mm, i + 1),
                "transaction": {
                    "date-time": format!("{}-{}-{:02}T09:30:00Z", year, mm, i + 1),
                    "price": {"amount": 100 * (i as i64 + 1), "currency": "GBP"},
                },
            })
        })
        .collect();
    Value::Array(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journey_records_are_deterministic_per_month() {
        let a = journey_records("acc-1", "2023", "7", 2);
        let b = journey_records("acc-1", "2023", "7", 2);
        assert_eq!(a, b);
        assert_eq!(a.as_array().unwrap().len(), 2);
        assert_eq!(a[0]["travel_date"], "2023-07-01");
    }

    #[test]
    fn purchase_records_pad_single_digit_months() {
        let records = purchase_records("acc-1", "2023", "7", 1);
        assert_eq!(records[0]["transaction"]["date-time"], "2023-07-01T09:30:00Z");
    }
}
