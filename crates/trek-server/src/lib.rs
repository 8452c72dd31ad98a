//! Trek Web Server
//!
//! Axum-based REST API for the trek transport activity dashboard. The
//! routes are thin proxies in front of the upstream transport-data API plus
//! convenience endpoints that run the fetch → aggregate → export pipeline
//! server-side:
//! - `/api/journey`, `/api/purchases` - per-month proxies with envelope
//!   unwrapping and status passthrough
//! - `/api/stats` - monthly summary for a fetch window
//! - `/api/export/journeys`, `/api/export/purchases` - CSV downloads
//! - `/api/accounts` - selectable demo accounts

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use trek_core::TransportApi;

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    /// Upstream transport-data API client
    pub upstream: TransportApi,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(
    upstream: TransportApi,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    info!("Upstream transport API: {}", upstream.base_url());

    let state = Arc::new(AppState {
        upstream,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Demo accounts
        .route("/accounts", get(handlers::list_accounts))
        // Upstream proxies
        .route("/journey", get(handlers::proxy_journeys))
        .route("/purchases", get(handlers::proxy_purchases))
        // Aggregated stats
        .route("/stats", get(handlers::get_stats))
        // CSV export
        .route("/export/journeys", get(handlers::export_journeys))
        .route("/export/purchases", get(handlers::export_purchases))
        .with_state(state);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    upstream: TransportApi,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(upstream, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_gateway(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
