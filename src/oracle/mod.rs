//! Price oracle module
//!
//! Aggregates samples from multiple sources into one trusted
//! price-and-volatility signal

mod aggregator;
mod history;
mod service;
mod types;

pub use aggregator::Aggregator;
pub use history::AggregateHistory;
pub use service::OracleService;
pub use types::{AggregatedPrice, AggregationError, PriceSample};
