//! Price source adapters
//!
//! Normalize external feeds into canonical `PriceSample`s. The
//! aggregator is transport-agnostic; everything HTTP lives here.

mod binance;
mod coinbase;
mod collector;

pub use binance::BinanceSource;
pub use coinbase::CoinbaseSource;
pub use collector::collect_samples;

use crate::config::{FeedConfig, SourceKind};
use crate::oracle::PriceSample;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for price source implementations
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Stable identifier carried on every sample
    fn source_id(&self) -> &str;

    /// Fetch one spot price observation
    async fn fetch(&self) -> anyhow::Result<PriceSample>;
}

/// Instantiate the configured sources
pub fn build_sources(config: &FeedConfig) -> Vec<Arc<dyn PriceSource>> {
    config
        .sources
        .iter()
        .map(|s| match s.kind {
            SourceKind::Binance => {
                Arc::new(BinanceSource::new(&s.symbol, s.weight)) as Arc<dyn PriceSource>
            }
            SourceKind::Coinbase => {
                Arc::new(CoinbaseSource::new(&s.symbol, s.weight)) as Arc<dyn PriceSource>
            }
        })
        .collect()
}
