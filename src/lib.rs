//! strike-shield: price oracle and PUT-option pricing core for a
//! Bitcoin protection marketplace
//!
//! This library provides the core components for:
//! - Price source adapters with bounded fan-out collection
//! - Outlier-resistant multi-source price aggregation
//! - Trailing volatility and 24h range estimation
//! - Deviation/heartbeat ledger price publishing
//! - Buyer premium and provider yield pricing engines
//! - Fixed-point on-ledger verification formula
//! - Observability stack

pub mod cli;
pub mod config;
pub mod feed;
pub mod oracle;
pub mod pricing;
pub mod publisher;
pub mod telemetry;
