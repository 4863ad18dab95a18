//! Prometheus metrics

use metrics::{gauge, histogram};
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// One source fetch within the collection window
    SourceFetch,
    /// Full aggregation cycle
    Aggregation,
    /// One pricing engine call
    Pricing,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Latest aggregated price
    OraclePrice,
    /// Latest annualized volatility estimate
    OracleVolatility,
    /// Sources surviving the last cycle
    SourceCount,
    /// Trailing 24h range width
    RangeWidth,
    /// Publishes submitted since start
    PublishCount,
    /// Aggregation cycles failed since start
    FailedCycles,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let name = match metric {
        LatencyMetric::SourceFetch => "shield_source_fetch_latency_ms",
        LatencyMetric::Aggregation => "shield_aggregation_latency_ms",
        LatencyMetric::Pricing => "shield_pricing_latency_ms",
    };
    histogram!(name).record(duration.as_secs_f64() * 1_000.0);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let name = match metric {
        GaugeMetric::OraclePrice => "shield_oracle_price_usd",
        GaugeMetric::OracleVolatility => "shield_oracle_volatility",
        GaugeMetric::SourceCount => "shield_oracle_source_count",
        GaugeMetric::RangeWidth => "shield_oracle_range_width_usd",
        GaugeMetric::PublishCount => "shield_publish_count",
        GaugeMetric::FailedCycles => "shield_failed_cycles",
    };
    gauge!(name).set(value);
}
