//! Command implementations

mod accounts;
mod export;
mod journeys;
mod serve;
mod stats;

pub use accounts::cmd_accounts;
pub use export::cmd_export;
pub use journeys::cmd_journeys;
pub use serve::cmd_serve;
pub use stats::cmd_stats;

use anyhow::{anyhow, Result};

use trek_core::demo::demo_providers;
use trek_core::{Session, TransportApi};

/// Build the upstream client from TREK_API_BASE_URL / TREK_API_KEY
pub fn api_from_env() -> Result<TransportApi> {
    TransportApi::from_env().ok_or_else(|| {
        anyhow!("TREK_API_BASE_URL is not set (export TREK_API_BASE_URL and optionally TREK_API_KEY)")
    })
}

/// Build the per-invocation session context for an account.
///
/// In the demo every provider is treated as connected; the session is passed
/// explicitly to each command instead of living in ambient storage.
pub fn session_for(account: &str) -> Session {
    let mut session = Session::new(account).with_providers(demo_providers());
    let provider_ids: Vec<String> = session.providers.iter().map(|p| p.id.clone()).collect();
    for id in provider_ids {
        session.connect_provider(&id);
    }
    session
}
