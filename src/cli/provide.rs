//! Provider yield subcommand

use super::quote::market_snapshot;
use crate::config::Config;
use crate::pricing::{price_yield, RiskTier, YieldParameters};
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct ProvideArgs {
    /// Risk tier: conservative, balanced or aggressive
    #[arg(long, default_value = "balanced")]
    pub tier: String,

    /// Committed collateral in BTC
    #[arg(long)]
    pub commitment: Decimal,

    /// Commitment duration in days
    #[arg(long, default_value = "90")]
    pub duration_days: u32,

    /// Spot price override; fetched from sources when omitted
    #[arg(long)]
    pub spot: Option<Decimal>,

    /// Annualized volatility to price with
    #[arg(long)]
    pub volatility: Decimal,
}

impl ProvideArgs {
    /// Estimate yield for one provider commitment
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let tier = parse_tier(&self.tier)?;
        let market = market_snapshot(self.spot, self.volatility, config).await?;
        let params = YieldParameters {
            risk_tier: tier,
            commitment_amount: self.commitment,
            duration_days: self.duration_days,
        };

        let result = price_yield(&params, &market, &config.pricing, Utc::now())?;

        println!(
            "Yield estimate ({:?}, {} BTC, {} days)",
            tier, self.commitment, self.duration_days
        );
        println!("  Spot:              {}", market.price.round_dp(2));
        println!("  Derived strike:    {}", result.derived_strike.round_dp(2));
        println!("  Estimated yield:   {}", result.estimated_yield.round_dp(2));
        println!(
            "  Annualized:        {}%",
            result.annualized_yield_percent.round_dp(2)
        );
        println!(
            "  Break-even acq.:   {}",
            result.break_even_acquisition_price.round_dp(2)
        );
        println!(
            "  Capital efficiency: {}",
            result.capital_efficiency.round_dp(6)
        );

        Ok(())
    }
}

fn parse_tier(value: &str) -> anyhow::Result<RiskTier> {
    match value.to_lowercase().as_str() {
        "conservative" => Ok(RiskTier::Conservative),
        "balanced" => Ok(RiskTier::Balanced),
        "aggressive" => Ok(RiskTier::Aggressive),
        other => anyhow::bail!("unknown risk tier {other:?}"),
    }
}
