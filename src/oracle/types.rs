//! Oracle data types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One price observation from one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSample {
    /// Stable source identifier (e.g., "binance")
    pub source_id: String,
    /// Observed price in quote currency
    pub price: Decimal,
    /// When the source reported this price
    pub observed_at: DateTime<Utc>,
    /// Source reliability prior in (0, 1]
    pub weight: Decimal,
}

impl PriceSample {
    /// Create a sample observed now
    pub fn new(
        source_id: impl Into<String>,
        price: Decimal,
        observed_at: DateTime<Utc>,
        weight: Decimal,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            price,
            observed_at,
            weight,
        }
    }

    /// A sample is usable if price is positive and weight is in (0, 1]
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ZERO && self.weight > Decimal::ZERO && self.weight <= Decimal::ONE
    }
}

/// The canonical aggregated price signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedPrice {
    /// Weighted aggregate over surviving samples
    pub price: Decimal,
    /// Trailing annualized volatility estimate
    pub volatility: Decimal,
    /// Whether the volatility window has enough points to be authoritative
    pub volatility_confident: bool,
    /// Low extreme of the trailing 24h window of aggregates
    pub range_low: Decimal,
    /// High extreme of the trailing 24h window of aggregates
    pub range_high: Decimal,
    /// Number of samples that passed validation
    pub source_count: usize,
    /// When this aggregate was computed
    pub computed_at: DateTime<Utc>,
}

impl AggregatedPrice {
    /// Age of this aggregate relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.computed_at
    }
}

/// Aggregation errors
#[derive(Debug, Error)]
pub enum AggregationError {
    /// Too few samples survived freshness and outlier filtering
    #[error("insufficient sources: {got} survived filtering, need at least {need}")]
    InsufficientSources { got: usize, need: usize },
}
