//! Configuration types for strike-shield
//!
//! All thresholds and tables are data loaded from TOML, never code,
//! so they can be swapped without redeploying the kernel.

use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Bounded collection window for the fan-out fetch (milliseconds)
    #[serde(default = "default_collection_window_ms")]
    pub collection_window_ms: u64,

    /// Configured sources with reliability weights
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

/// One configured price source
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub symbol: String,
    /// Reliability prior in (0, 1]
    pub weight: Decimal,
}

/// Supported source adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Binance,
    Coinbase,
}

fn default_collection_window_ms() -> u64 {
    3_000
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            kind: SourceKind::Binance,
            symbol: "BTCUSDT".to_string(),
            weight: Decimal::new(6, 1), // 0.6
        },
        SourceConfig {
            kind: SourceKind::Coinbase,
            symbol: "BTC-USD".to_string(),
            weight: Decimal::new(4, 1), // 0.4
        },
    ]
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            collection_window_ms: default_collection_window_ms(),
            sources: default_sources(),
        }
    }
}

/// Oracle aggregation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Samples older than this are discarded (seconds)
    #[serde(default = "default_max_sample_age_secs")]
    pub max_sample_age_secs: u64,

    /// Outlier cutoff as a multiple of the median absolute deviation
    #[serde(default = "default_mad_multiplier")]
    pub mad_multiplier: Decimal,

    /// Minimum surviving sources for a valid aggregate
    #[serde(default = "default_min_sources")]
    pub min_sources: usize,

    /// Trailing aggregates retained for volatility
    #[serde(default = "default_history_points")]
    pub history_points: usize,

    /// Points required before volatility is authoritative
    #[serde(default = "default_min_volatility_points")]
    pub min_volatility_points: usize,

    /// Range window over trailing aggregates (hours)
    #[serde(default = "default_range_window_hours")]
    pub range_window_hours: i64,

    /// Timer-driven cycle interval (seconds)
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
}

fn default_max_sample_age_secs() -> u64 {
    300
}
fn default_mad_multiplier() -> Decimal {
    Decimal::from(5)
}
fn default_min_sources() -> usize {
    2
}
fn default_history_points() -> usize {
    30
}
fn default_min_volatility_points() -> usize {
    10
}
fn default_range_window_hours() -> i64 {
    24
}
fn default_cycle_interval_secs() -> u64 {
    60
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            max_sample_age_secs: default_max_sample_age_secs(),
            mad_multiplier: default_mad_multiplier(),
            min_sources: default_min_sources(),
            history_points: default_history_points(),
            min_volatility_points: default_min_volatility_points(),
            range_window_hours: default_range_window_hours(),
            cycle_interval_secs: default_cycle_interval_secs(),
        }
    }
}

/// Ledger publisher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PublisherConfig {
    /// Relative price move that forces a publish (e.g. 0.01 = 1%)
    #[serde(default = "default_deviation_threshold")]
    pub deviation_threshold: Decimal,

    /// Heartbeat: maximum age of the published price (seconds)
    #[serde(default = "default_max_staleness_secs")]
    pub max_staleness_secs: u64,
}

fn default_deviation_threshold() -> Decimal {
    Decimal::new(1, 2) // 0.01 = 1%
}
fn default_max_staleness_secs() -> u64 {
    3_600
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: default_deviation_threshold(),
            max_staleness_secs: default_max_staleness_secs(),
        }
    }
}

/// Pricing engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Lowest accepted strike as percent of spot
    #[serde(default = "default_strike_percent_min")]
    pub strike_percent_min: Decimal,

    /// Highest accepted strike as percent of spot
    #[serde(default = "default_strike_percent_max")]
    pub strike_percent_max: Decimal,

    /// Accepted protection durations (days)
    #[serde(default = "default_allowed_durations")]
    pub allowed_durations: Vec<u32>,

    /// Refuse to price on market data older than this (seconds)
    #[serde(default = "default_max_market_age_secs")]
    pub max_market_age_secs: u64,

    /// Scenario band around spot, percent each side
    #[serde(default = "default_scenario_band_percent")]
    pub scenario_band_percent: Decimal,

    /// Number of scenario price points
    #[serde(default = "default_scenario_steps")]
    pub scenario_steps: usize,

    /// Baseline volatility separating the pure-time component
    /// from the volatility component in the breakdown
    #[serde(default = "default_baseline_volatility")]
    pub baseline_volatility: Decimal,

    /// Allowed relative divergence between the off-ledger engine
    /// and the on-ledger verification formula
    #[serde(default = "default_consistency_tolerance")]
    pub consistency_tolerance: Decimal,

    /// Risk tier table for the yield engine
    #[serde(default)]
    pub tiers: TierTable,
}

fn default_strike_percent_min() -> Decimal {
    Decimal::from(50)
}
fn default_strike_percent_max() -> Decimal {
    Decimal::from(150)
}
fn default_allowed_durations() -> Vec<u32> {
    vec![30, 90, 180, 360]
}
fn default_max_market_age_secs() -> u64 {
    300
}
fn default_scenario_band_percent() -> Decimal {
    Decimal::from(50)
}
fn default_scenario_steps() -> usize {
    21
}
fn default_baseline_volatility() -> Decimal {
    Decimal::new(10, 2) // 0.10
}
fn default_consistency_tolerance() -> Decimal {
    Decimal::new(2, 2) // 0.02 = 2%
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            strike_percent_min: default_strike_percent_min(),
            strike_percent_max: default_strike_percent_max(),
            allowed_durations: default_allowed_durations(),
            max_market_age_secs: default_max_market_age_secs(),
            scenario_band_percent: default_scenario_band_percent(),
            scenario_steps: default_scenario_steps(),
            baseline_volatility: default_baseline_volatility(),
            consistency_tolerance: default_consistency_tolerance(),
            tiers: TierTable::default(),
        }
    }
}

/// Strike-offset and rate-multiplier policy per risk tier
#[derive(Debug, Clone, Deserialize)]
pub struct TierPolicy {
    /// Strike offset from spot, percent (negative = below spot)
    pub strike_offset_percent: Decimal,
    /// Multiplier applied to the premium-derived rate
    pub rate_multiplier: Decimal,
}

/// Fixed lookup mapping risk tiers to pricing policy.
///
/// Not user-adjustable per request, so tiers stay comparable
/// across providers.
#[derive(Debug, Clone, Deserialize)]
pub struct TierTable {
    #[serde(default = "default_conservative")]
    pub conservative: TierPolicy,
    #[serde(default = "default_balanced")]
    pub balanced: TierPolicy,
    #[serde(default = "default_aggressive")]
    pub aggressive: TierPolicy,
}

fn default_conservative() -> TierPolicy {
    TierPolicy {
        strike_offset_percent: Decimal::from(-20),
        rate_multiplier: Decimal::new(80, 2), // 0.80
    }
}
fn default_balanced() -> TierPolicy {
    TierPolicy {
        strike_offset_percent: Decimal::from(-10),
        rate_multiplier: Decimal::ONE,
    }
}
fn default_aggressive() -> TierPolicy {
    TierPolicy {
        strike_offset_percent: Decimal::ZERO,
        rate_multiplier: Decimal::new(120, 2), // 1.20
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            conservative: default_conservative(),
            balanced: default_balanced(),
            aggressive: default_aggressive(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_metrics_port() -> u16 {
    9_090
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
