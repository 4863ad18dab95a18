//! Protection quote subcommand

use crate::config::Config;
use crate::oracle::AggregatedPrice;
use crate::pricing::{
    check_divergence, from_fixed_point, onledger_premium, price_protection, to_fixed_point,
    PolicyType, ProtectionParameters,
};
use crate::telemetry::{record_latency, LatencyMetric};
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Instant;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Strike as percent of current price
    #[arg(long, default_value = "100")]
    pub strike_percent: Decimal,

    /// Protected amount in BTC
    #[arg(long)]
    pub amount: Decimal,

    /// Protection duration in days
    #[arg(long, default_value = "30")]
    pub duration_days: u32,

    /// Spot price override; fetched from sources when omitted
    #[arg(long)]
    pub spot: Option<Decimal>,

    /// Annualized volatility to price with
    #[arg(long)]
    pub volatility: Decimal,
}

impl QuoteArgs {
    /// Price one protection request and verify it on-ledger
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let market = market_snapshot(self.spot, self.volatility, config).await?;
        let params = ProtectionParameters {
            strike_percent: self.strike_percent,
            amount: self.amount,
            duration_days: self.duration_days,
            policy_type: PolicyType::Put,
        };

        let started = Instant::now();
        let result = price_protection(&params, &market, &config.pricing, Utc::now())?;
        record_latency(LatencyMetric::Pricing, started.elapsed());

        println!("Protection quote ({} BTC, {} days)", self.amount, self.duration_days);
        println!("  Spot:            {}", market.price.round_dp(2));
        println!("  Strike:          {}", result.strike_price.round_dp(2));
        println!("  Premium:         {}", result.premium.round_dp(2));
        println!(
            "  Premium %:       {}%",
            result.premium_percentage.round_dp(4)
        );
        println!("  Break-even:      {}", result.break_even_price.round_dp(2));
        println!("  Max benefit:     {}", result.max_benefit.round_dp(2));
        println!(
            "  Breakdown:       intrinsic {} / time {} / volatility {}",
            result.breakdown.intrinsic_value.round_dp(2),
            result.breakdown.time_value.round_dp(2),
            result.breakdown.volatility_component.round_dp(2)
        );

        // Side-by-side verification against the on-ledger formula
        let on_unit = onledger_premium(
            to_fixed_point(market.price),
            to_fixed_point(result.strike_price),
            self.duration_days,
            to_fixed_point(market.volatility),
        );
        let on_premium = from_fixed_point(on_unit) * self.amount;
        let agrees = check_divergence(
            result.premium,
            on_premium,
            config.pricing.consistency_tolerance,
        );
        println!(
            "  Ledger check:    {} (on-ledger {})",
            if agrees { "ok" } else { "DIVERGED" },
            on_premium.round_dp(2)
        );

        Ok(())
    }
}

/// Build the market input for offline pricing, fetching spot from the
/// configured sources when not supplied
pub(super) async fn market_snapshot(
    spot: Option<Decimal>,
    volatility: Decimal,
    config: &Config,
) -> anyhow::Result<AggregatedPrice> {
    let (price, source_count) = match spot {
        Some(price) => (price, 1),
        None => {
            let sources = crate::feed::build_sources(&config.feed);
            let window = std::time::Duration::from_millis(config.feed.collection_window_ms);
            let samples = crate::feed::collect_samples(&sources, window).await;
            let mut aggregator = crate::oracle::Aggregator::new(config.oracle.clone());
            let aggregate = aggregator.aggregate(&samples, Utc::now())?;
            (aggregate.price, aggregate.source_count)
        }
    };

    if volatility <= dec!(0) {
        anyhow::bail!("volatility must be positive");
    }

    Ok(AggregatedPrice {
        price,
        volatility,
        volatility_confident: true,
        range_low: price,
        range_high: price,
        source_count,
        computed_at: Utc::now(),
    })
}
