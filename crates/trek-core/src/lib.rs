//! Trek Core Library
//!
//! Shared functionality for the trek transport activity dashboard:
//! - Canonical journey/purchase records with null/unknown sentinels
//! - Record normalization for ragged upstream JSON (envelope unwrapping)
//! - Upstream API client with concurrent month-range fetching
//! - Monthly aggregation (spend, CO2, top operator, mode distribution)
//! - Presentation formatters for currency, dates and transport modes
//! - CSV export with typed column accessors

pub mod aggregate;
pub mod client;
pub mod demo;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod normalize;

/// Test utilities including the mock upstream transport API
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{monthly_stats, monthly_summary};
pub use client::{RecordKind, TransportApi};
pub use error::{Error, Result};
pub use export::{journey_columns, purchase_columns, to_csv, Column};
pub use models::{
    DateRange, DemoAccount, Journey, Metric, MonthBatch, MonthReport, MonthlyStats,
    MonthlySummary, Operator, Price, Purchase, RangeOutcome, RecordId, Session, Transaction,
    TransportProvider,
};
pub use normalize::{normalize_journey, normalize_purchase, unwrap_envelope};
