//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use trek_core::test_utils::{MockTransportServer, MockUpstreamOptions};

fn test_app(upstream_url: &str) -> Router {
    let upstream = TransportApi::new(upstream_url, Some("test-key"));
    create_router(upstream, None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ========== Demo Account Tests ==========

#[tokio::test]
async fn test_list_accounts() {
    let app = test_app("http://127.0.0.1:1");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let accounts = json.as_array().unwrap();
    assert!(!accounts.is_empty());
    assert!(accounts[0].get("account_id").is_some());
}

// ========== Proxy Tests ==========

#[tokio::test]
async fn test_journey_proxy_unwraps_envelope() {
    let server = MockTransportServer::start_with(MockUpstreamOptions {
        envelope: true,
        ..Default::default()
    })
    .await;
    let app = test_app(&server.url());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/journey?account_id=acc-1&year=2023&month=7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // The envelope is gone: the reply is the inner record array
    let json = get_body_json(response).await;
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "j-2023-07-1");
}

#[tokio::test]
async fn test_journey_proxy_network_failure_yields_fixed_body() {
    // Nothing listens here: the upstream call fails at the transport level
    let app = test_app("http://127.0.0.1:1");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/journey?account_id=acc-1&year=2023&month=7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "Failed to fetch journeys"}));
}

#[tokio::test]
async fn test_purchases_proxy_passes_through_success() {
    let server = MockTransportServer::start().await;
    let app = test_app(&server.url());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/purchases?account_id=acc-1&year=2023&month=7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_purchases_proxy_echoes_upstream_error() {
    let server = MockTransportServer::start_with(MockUpstreamOptions {
        fail_months: vec!["7".to_string()],
        ..Default::default()
    })
    .await;
    let app = test_app(&server.url());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/purchases?account_id=acc-1&year=2023&month=7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "External API error");
    assert_eq!(json["status"], 500);
    assert!(json.get("details").is_some());
}

#[tokio::test]
async fn test_proxy_missing_params_is_bad_request() {
    let app = test_app("http://127.0.0.1:1");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/journey?account_id=acc-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Stats Tests ==========

#[tokio::test]
async fn test_stats_returns_monthly_summary() {
    let server = MockTransportServer::start().await;
    let app = test_app(&server.url());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats?account_id=acc-1&target_month=2023-07")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["journeys"], 2);
    assert_eq!(json["totalSpend"], 300);
    assert_eq!(json["topOperator"], "Arriva");
    assert_eq!(json["averageCost"], 150.0);
}

#[tokio::test]
async fn test_stats_invalid_month_is_bad_request() {
    let app = test_app("http://127.0.0.1:1");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats?account_id=acc-1&month=13")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_upstream_failure_is_bad_gateway() {
    let server = MockTransportServer::start_with(MockUpstreamOptions {
        fail_months: vec!["6".to_string()],
        ..Default::default()
    })
    .await;
    let app = test_app(&server.url());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats?account_id=acc-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Upstream API error"));
}

// ========== Export Tests ==========

#[tokio::test]
async fn test_export_journeys_csv_download() {
    let server = MockTransportServer::start().await;
    let app = test_app(&server.url());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/export/journeys?account_id=acc-1&months_back=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"journeys-"));

    let csv = get_body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Mode,Distance (km),CO₂ (g),Journey ID")
    );
    assert_eq!(lines.clone().count(), 2); // one window month, two records
    assert!(lines.next().unwrap().starts_with("2023-07-01,bus,5.5,120,"));
}

#[tokio::test]
async fn test_export_purchases_csv_download() {
    let server = MockTransportServer::start().await;
    let app = test_app(&server.url());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/export/purchases?account_id=acc-1&months_back=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let csv = get_body_text(response).await;
    assert!(csv.starts_with("Date/Time,Operator,Mode,Amount (pence),Transaction ID\n"));
    assert!(csv.contains("2023-07-01T09:30:00Z,Arriva,bus,100,p-2023-07-1"));
}
