//! HTTP request handlers organized by domain

pub mod accounts;
pub mod export;
pub mod proxy;
pub mod stats;

// Re-export all handlers for use in router
pub use accounts::*;
pub use export::*;
pub use proxy::*;
pub use stats::*;
