//! BTC price dashboard: a daily report aggregator over a flat-file price store,
//! and an HTTP/terminal dashboard that polls both stores.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod report;
pub mod store;
pub mod types;
