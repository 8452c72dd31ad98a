//! Domain models for trek
//!
//! Canonical record types for journeys and purchases, the month-range fetch
//! key, and the derived monthly statistics. Raw upstream JSON is turned into
//! these types by the `normalize` module; everything downstream (aggregation,
//! formatting, CSV export) works on canonical records only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A numeric field as reported by a transport provider.
///
/// Providers distinguish between data they could not supply (`"unknown"`) and
/// data that is simply absent (`null` or missing). Both are kept as
/// first-class values so display and aggregation can treat them differently
/// from a real number.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    /// A finite number supplied by the provider
    Known(f64),
    /// The provider reported the literal `"unknown"`
    Unavailable,
    /// Field absent or `null`
    Missing,
    /// A non-numeric value; preserved verbatim for display contexts
    Raw(String),
}

impl Metric {
    /// Coerce a raw JSON value into a metric.
    ///
    /// Numbers and numeric strings become `Known`; the literal `"unknown"`
    /// becomes `Unavailable`; `null` becomes `Missing`; anything else is kept
    /// as `Raw` so it can be rendered as-is.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Metric::Missing,
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => Metric::Known(f),
                _ => Metric::Missing,
            },
            Value::String(s) if s == "unknown" => Metric::Unavailable,
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Metric::Known(f),
                _ => Metric::Raw(s.clone()),
            },
            other => Metric::Raw(other.to_string()),
        }
    }

    /// The numeric value, when the provider supplied one
    pub fn known(&self) -> Option<f64> {
        match self {
            Metric::Known(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Metric::Known(_))
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Missing
    }
}

// Serializes back to the wire shape: number, "unknown", null, or the raw
// string, so canonical records round-trip to what the dashboard shipped.
impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Metric::Known(f) => serializer.serialize_f64(*f),
            Metric::Unavailable => serializer.serialize_str("unknown"),
            Metric::Missing => serializer.serialize_none(),
            Metric::Raw(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Metric::from_value(&value))
    }
}

/// A record identifier as supplied upstream (string or number)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A transport operator reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl Operator {
    /// Display name: `name`, falling back to `id`, falling back to "Unknown"
    pub fn display(&self) -> &str {
        self.name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.id.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown")
    }
}

/// A price in minor currency units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (e.g. pence); `Unavailable`/`Missing` when the
    /// provider could not supply one
    pub amount: Metric,
    /// ISO currency code; "GBP" when upstream omitted it
    pub currency: String,
}

impl Default for Price {
    fn default() -> Self {
        Self {
            amount: Metric::Missing,
            currency: "GBP".to_string(),
        }
    }
}

/// The payment part of a purchase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// ISO timestamp of the payment; also the month-filter key for purchases
    pub date_time: Option<String>,
    pub price: Price,
}

/// One completed trip record from a transport provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub id: Option<RecordId>,
    pub account_id: Option<String>,
    /// ISO date string; the month-filter key for journeys
    pub travel_date: Option<String>,
    /// Transport mode code ("bus", "train", ...); "unknown" when absent
    pub mode: String,
    pub operator: Operator,
    pub distance_km: Metric,
    pub co2_g: Metric,
    /// Encoded route polyline, when the provider supplies one
    pub polyline: Option<String>,
    pub price: Option<Price>,
}

/// One payment/ticket transaction record from a transport provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Option<RecordId>,
    pub mode: String,
    pub operator: Operator,
    pub transaction: Transaction,
    pub booking_date_time: Option<String>,
}

// The canonical "absent" record has an unknown mode, not an empty one.
impl Default for Journey {
    fn default() -> Self {
        Self {
            id: None,
            account_id: None,
            travel_date: None,
            mode: "unknown".to_string(),
            operator: Operator::default(),
            distance_km: Metric::Missing,
            co2_g: Metric::Missing,
            polyline: None,
            price: None,
        }
    }
}

impl Default for Purchase {
    fn default() -> Self {
        Self {
            id: None,
            mode: "unknown".to_string(),
            operator: Operator::default(),
            transaction: Transaction::default(),
            booking_date_time: None,
        }
    }
}

/// A (year, month) fetch key.
///
/// Month is a 1-2 digit string, not zero-padded. Duplicate ranges in a fetch
/// list are not de-duplicated; they produce duplicate records downstream and
/// are the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub year: String,
    pub month: String,
}

impl DateRange {
    pub fn new(year: impl Into<String>, month: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
        }
    }

    /// The zero-padded "YYYY-MM" prefix used for month filtering, or `None`
    /// when the month is not a number
    pub fn month_prefix(&self) -> Option<String> {
        let month: u32 = self.month.trim().parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(format!("{}-{:02}", self.year, month))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

/// Build `count + 1` ranges ending at the anchor month, walking backwards
/// across year boundaries. Months are emitted non-zero-padded.
pub fn months_back(anchor_year: i32, anchor_month: u32, count: u32) -> Vec<DateRange> {
    let mut ranges = Vec::with_capacity(count as usize + 1);
    let mut year = anchor_year;
    let mut month = anchor_month;
    for _ in 0..=count {
        ranges.push(DateRange::new(year.to_string(), month.to_string()));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    ranges
}

/// Monthly KPI statistics shown by the dashboard stat cards.
///
/// Derived and recomputed on demand; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Journey count for the month
    pub journeys: usize,
    /// Sum of numeric transaction amounts, in minor units
    #[serde(rename = "totalSpend")]
    pub total_spend: i64,
    /// Operator with the most purchases; "None" when there are no purchases
    #[serde(rename = "topOperator")]
    pub top_operator: String,
    /// Sum of numeric CO2 values, in grams
    #[serde(rename = "totalCO2")]
    pub total_co2_g: f64,
}

/// Extended monthly summary backing the quick-stats panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    #[serde(flatten)]
    pub stats: MonthlyStats,
    /// totalSpend / journeys, in minor units; `None` when there are no
    /// journeys
    #[serde(rename = "averageCost")]
    pub average_cost: Option<f64>,
    /// Mode code with the highest journey count
    #[serde(rename = "topMode")]
    pub top_mode: Option<String>,
    /// Sum of numeric distances, in kilometres
    #[serde(rename = "totalDistanceKm")]
    pub total_distance_km: f64,
}

/// The flattened result of a multi-month fetch
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthBatch {
    pub journeys: Vec<Journey>,
    pub purchases: Vec<Purchase>,
}

/// Outcome of fetching one (range, kind) pair in a partial fetch
#[derive(Debug, Clone)]
pub enum RangeOutcome<T> {
    Ok(Vec<T>),
    Failed(String),
}

impl<T> RangeOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, RangeOutcome::Failed(_))
    }
}

/// Per-range results of a partial multi-month fetch.
///
/// Successes keep their records even when sibling ranges failed, so a view
/// can render partial data alongside per-range failure flags.
#[derive(Debug)]
pub struct MonthReport {
    pub ranges: Vec<DateRange>,
    pub journeys: Vec<RangeOutcome<Journey>>,
    pub purchases: Vec<RangeOutcome<Purchase>>,
}

impl MonthReport {
    /// Ranges for which either kind failed, with the failure message
    pub fn failures(&self) -> Vec<(&DateRange, &str)> {
        let mut out = Vec::new();
        for (i, range) in self.ranges.iter().enumerate() {
            if let RangeOutcome::Failed(msg) = &self.journeys[i] {
                out.push((range, msg.as_str()));
            }
            if let RangeOutcome::Failed(msg) = &self.purchases[i] {
                out.push((range, msg.as_str()));
            }
        }
        out
    }

    /// All successfully fetched records, flattened in range order
    pub fn into_batch(self) -> MonthBatch {
        let mut batch = MonthBatch::default();
        for outcome in self.journeys {
            if let RangeOutcome::Ok(mut records) = outcome {
                batch.journeys.append(&mut records);
            }
        }
        for outcome in self.purchases {
            if let RangeOutcome::Ok(mut records) = outcome {
                batch.purchases.append(&mut records);
            }
        }
        batch
    }
}

/// A demo account selectable on the landing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoAccount {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub description: String,
    pub avatar: String,
}

/// A simulated transport provider the user can "connect"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportProvider {
    pub id: String,
    pub name: String,
    pub description: String,
    pub connected: bool,
}

/// Per-view fetch context: the selected account, connected providers and the
/// last successful fetch time. Passed explicitly to each view instead of
/// living in ambient storage.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: String,
    pub providers: Vec<TransportProvider>,
    pub last_fetch: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            providers: Vec::new(),
            last_fetch: None,
        }
    }

    pub fn with_providers(mut self, providers: Vec<TransportProvider>) -> Self {
        self.providers = providers;
        self
    }

    pub fn connect_provider(&mut self, provider_id: &str) {
        for provider in &mut self.providers {
            if provider.id == provider_id {
                provider.connected = true;
            }
        }
    }

    pub fn is_connected(&self, provider_id: &str) -> bool {
        self.providers
            .iter()
            .any(|p| p.id == provider_id && p.connected)
    }

    pub fn record_fetch(&mut self, at: DateTime<Utc>) {
        self.last_fetch = Some(at);
    }
}
