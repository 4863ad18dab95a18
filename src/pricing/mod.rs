//! Premium and yield calculation engines
//!
//! Pure functions over `AggregatedPrice` plus request parameters.
//! The off-ledger engine (`premium`, `yield_engine`) and the on-ledger
//! verification formula (`onledger`) implement one documented pricing
//! contract and must agree within a configured tolerance.

mod kernel;
mod onledger;
mod premium;
mod yield_engine;

pub use kernel::{per_unit_premium, PerUnitPremium};
pub use onledger::{
    check_divergence, from_fixed_point, onledger_premium, to_fixed_point, PRICE_SCALE,
};
pub use premium::price_protection;
pub use yield_engine::price_yield;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported policy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    /// Downside protection: pays the shortfall below the strike
    Put,
}

/// Buyer-side protection request
#[derive(Debug, Clone)]
pub struct ProtectionParameters {
    /// Strike as percent of current price
    pub strike_percent: Decimal,
    /// Protected amount in asset units
    pub amount: Decimal,
    /// Protection duration in days
    pub duration_days: u32,
    /// Policy type
    pub policy_type: PolicyType,
}

/// Provider risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Conservative,
    Balanced,
    Aggressive,
}

/// Provider-side yield request
#[derive(Debug, Clone)]
pub struct YieldParameters {
    pub risk_tier: RiskTier,
    /// Committed collateral in asset units
    pub commitment_amount: Decimal,
    /// Commitment duration in days
    pub duration_days: u32,
}

/// One scenario price point and its payoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub price: Decimal,
    /// Net payoff at that price: intrinsic payout minus premium paid
    pub payoff: Decimal,
}

/// Additive premium decomposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    /// Immediate exercise value
    pub intrinsic_value: Decimal,
    /// Extrinsic value at the baseline volatility
    pub time_value: Decimal,
    /// Extrinsic value above the baseline, driven by realized volatility
    pub volatility_component: Decimal,
}

/// Buyer-side pricing output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingResult {
    /// Total premium in quote currency
    pub premium: Decimal,
    /// Premium as percent of protected value
    pub premium_percentage: Decimal,
    /// Strike in quote currency
    pub strike_price: Decimal,
    /// Price at which the position nets to zero
    pub break_even_price: Decimal,
    /// Payout if price falls to zero
    pub max_benefit: Decimal,
    /// Payoffs across the scenario band, ascending by price
    pub scenarios: Vec<Scenario>,
    pub breakdown: ComponentBreakdown,
}

/// Provider-side pricing output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldResult {
    /// Expected premium income in quote currency
    pub estimated_yield: Decimal,
    /// Annualized yield on capital at risk, percent
    pub annualized_yield_percent: Decimal,
    /// Strike derived from the tier's offset
    pub derived_strike: Decimal,
    /// Effective acquisition price if assigned
    pub break_even_acquisition_price: Decimal,
    /// Premium income per unit of capital at risk
    pub capital_efficiency: Decimal,
}

/// Pricing engine errors
#[derive(Debug, Error)]
pub enum PricingError {
    /// Request parameters outside the configured ranges
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// Market data older than the freshness bound
    #[error("stale market data: {age_secs}s old, maximum {max_secs}s")]
    StaleMarketData { age_secs: i64, max_secs: i64 },
    /// Volatility window has not filled yet
    #[error("volatility estimate is not yet authoritative")]
    LowConfidenceVolatility,
}
