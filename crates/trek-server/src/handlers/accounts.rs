//! Demo account handlers

use axum::Json;

use trek_core::demo::demo_accounts;
use trek_core::DemoAccount;

/// GET /api/accounts - List the selectable demo accounts
pub async fn list_accounts() -> Json<Vec<DemoAccount>> {
    Json(demo_accounts())
}
