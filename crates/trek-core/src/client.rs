//! Upstream transport-data API client
//!
//! HTTP client for the transport aggregation API. One retrieval per
//! (month-range, record kind); multi-month fetches run every retrieval
//! concurrently and join, so total latency is bounded by the slowest single
//! call rather than the sum.
//!
//! Two join flavors are provided: `fetch_months` is all-or-nothing (any
//! failed range fails the whole call and partial data is discarded), while
//! `fetch_months_partial` tags each range success/failure so a view can show
//! partial data. Neither cancels in-flight retrievals on failure; abandoned
//! tasks run to completion and their results are dropped.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{DateRange, Journey, MonthBatch, MonthReport, Purchase, RangeOutcome};
use crate::normalize::{journeys_from_body, purchases_from_body, unwrap_envelope};

/// The two record kinds the upstream serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Journeys,
    Purchases,
}

impl RecordKind {
    /// Upstream path segment
    pub fn path(&self) -> &'static str {
        match self {
            Self::Journeys => "journeys",
            Self::Purchases => "purchases",
        }
    }
}

/// Client for the upstream transport-data API.
///
/// # Configuration
///
/// `TREK_API_BASE_URL` is the upstream base URL; `TREK_API_KEY`, when set,
/// is forwarded as the `x-api-key` header on every request.
#[derive(Clone)]
pub struct TransportApi {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TransportApi {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(String::from),
        }
    }

    /// Create from environment variables; `None` when no base URL is set
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("TREK_API_BASE_URL").ok()?;
        let api_key = std::env::var("TREK_API_KEY").ok();
        Some(Self::new(&base_url, api_key.as_deref()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One upstream call with the status passed through.
    ///
    /// The body is envelope-unwrapped: a string `body` field holding a second
    /// JSON document is decoded, falling back to the raw string when the
    /// inner parse fails. Used directly by the proxy routes, which forward
    /// the upstream status verbatim.
    pub async fn get_raw(
        &self,
        kind: RecordKind,
        account_id: &str,
        year: &str,
        month: &str,
    ) -> Result<(u16, Value)> {
        let url = format!(
            "{}/{}?account_id={}&year={}&month={}",
            self.base_url,
            kind.path(),
            account_id,
            year,
            month
        );
        debug!(%url, "fetching upstream");

        let mut request = self
            .http_client
            .get(&url)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body: Value = response.json().await?;

        Ok((status, unwrap_envelope(body)))
    }

    /// Fetch and normalize one month of journeys
    pub async fn get_journeys(&self, account_id: &str, range: &DateRange) -> Result<Vec<Journey>> {
        let (status, body) = self
            .get_raw(RecordKind::Journeys, account_id, &range.year, &range.month)
            .await?;
        if !(200..300).contains(&status) {
            return Err(Error::Upstream {
                status,
                detail: body.to_string(),
            });
        }
        if !body.is_array() {
            warn!(status, %range, "journeys body is not an array; yielding no records");
        }
        Ok(journeys_from_body(&body))
    }

    /// Fetch and normalize one month of purchases
    pub async fn get_purchases(
        &self,
        account_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Purchase>> {
        let (status, body) = self
            .get_raw(RecordKind::Purchases, account_id, &range.year, &range.month)
            .await?;
        if !(200..300).contains(&status) {
            return Err(Error::Upstream {
                status,
                detail: body.to_string(),
            });
        }
        if !body.is_array() {
            warn!(status, %range, "purchases body is not an array; yielding no records");
        }
        Ok(purchases_from_body(&body))
    }

    /// Fetch several months of journeys and purchases, all-or-nothing.
    ///
    /// Every (range, kind) retrieval is spawned up front; results are joined
    /// in range order, so the flattened vectors concatenate per-range results
    /// in the order the ranges were supplied. No cross-range de-duplication
    /// happens here: duplicate ranges produce duplicate records.
    ///
    /// Any failed retrieval fails the whole call; partial data is discarded.
    pub async fn fetch_months(&self, account_id: &str, ranges: &[DateRange]) -> Result<MonthBatch> {
        let (journey_tasks, purchase_tasks) = self.spawn_range_tasks(account_id, ranges);

        let mut batch = MonthBatch::default();
        for task in journey_tasks {
            batch.journeys.extend(join_task(task).await?);
        }
        for task in purchase_tasks {
            batch.purchases.extend(join_task(task).await?);
        }
        Ok(batch)
    }

    /// Fetch several months with per-range outcomes instead of one error.
    ///
    /// A failed range is tagged `Failed` with its error message; sibling
    /// ranges keep their records, enabling partial-data display.
    pub async fn fetch_months_partial(
        &self,
        account_id: &str,
        ranges: &[DateRange],
    ) -> MonthReport {
        let (journey_tasks, purchase_tasks) = self.spawn_range_tasks(account_id, ranges);

        let mut journeys = Vec::with_capacity(ranges.len());
        for task in journey_tasks {
            journeys.push(outcome(join_task(task).await));
        }
        let mut purchases = Vec::with_capacity(ranges.len());
        for task in purchase_tasks {
            purchases.push(outcome(join_task(task).await));
        }

        MonthReport {
            ranges: ranges.to_vec(),
            journeys,
            purchases,
        }
    }

    #[allow(clippy::type_complexity)]
    fn spawn_range_tasks(
        &self,
        account_id: &str,
        ranges: &[DateRange],
    ) -> (
        Vec<tokio::task::JoinHandle<Result<Vec<Journey>>>>,
        Vec<tokio::task::JoinHandle<Result<Vec<Purchase>>>>,
    ) {
        let journey_tasks = ranges
            .iter()
            .map(|range| {
                let api = self.clone();
                let account = account_id.to_string();
                let range = range.clone();
                tokio::spawn(async move { api.get_journeys(&account, &range).await })
            })
            .collect();
        let purchase_tasks = ranges
            .iter()
            .map(|range| {
                let api = self.clone();
                let account = account_id.to_string();
                let range = range.clone();
                tokio::spawn(async move { api.get_purchases(&account, &range).await })
            })
            .collect();
        (journey_tasks, purchase_tasks)
    }
}

async fn join_task<T>(task: tokio::task::JoinHandle<Result<T>>) -> Result<T> {
    task.await
        .map_err(|e| Error::InvalidData(format!("fetch task failed: {}", e)))?
}

fn outcome<T>(result: Result<Vec<T>>) -> RangeOutcome<T> {
    match result {
        Ok(records) => RangeOutcome::Ok(records),
        Err(e) => RangeOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kind_paths() {
        assert_eq!(RecordKind::Journeys.path(), "journeys");
        assert_eq!(RecordKind::Purchases.path(), "purchases");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = TransportApi::new("https://api.example.com/", None);
        assert_eq!(api.base_url(), "https://api.example.com");
    }
}
