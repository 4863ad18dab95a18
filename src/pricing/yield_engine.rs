//! Provider-side yield engine
//!
//! Mirror of the premium engine: the chosen risk tier derives the
//! strike, the same kernel prices it, and the result is expressed as
//! income on committed capital.

use super::kernel::{per_unit_premium, to_decimal, to_f64, year_fraction};
use super::premium::check_market;
use super::{PricingError, RiskTier, YieldParameters, YieldResult};
use crate::config::{PricingConfig, TierPolicy};
use crate::oracle::AggregatedPrice;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Estimate provider yield for a commitment at the given risk tier.
///
/// Pure, like `price_protection`; same stale-data and parameter
/// failure modes.
pub fn price_yield(
    params: &YieldParameters,
    market: &AggregatedPrice,
    config: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<YieldResult, PricingError> {
    validate(params, config)?;
    check_market(market, config, now)?;

    let policy = tier_policy(params.risk_tier, config);
    let spot = market.price;
    let derived_strike = spot * (dec!(100) + policy.strike_offset_percent) / dec!(100);

    let unit = per_unit_premium(
        to_f64(spot),
        to_f64(derived_strike),
        year_fraction(params.duration_days),
        to_f64(market.volatility),
    );
    let per_unit = to_decimal(unit.total());

    let estimated_yield = per_unit * params.commitment_amount * policy.rate_multiplier;
    let yield_per_unit = estimated_yield / params.commitment_amount;
    let break_even_acquisition_price = derived_strike - yield_per_unit;

    // Capital at risk per unit is the strike the provider may be
    // assigned at, so efficiency is income over that exposure.
    let capital_efficiency = yield_per_unit / derived_strike;
    let annualized_yield_percent =
        capital_efficiency * dec!(365) / Decimal::from(params.duration_days) * dec!(100);

    Ok(YieldResult {
        estimated_yield,
        annualized_yield_percent,
        derived_strike,
        break_even_acquisition_price,
        capital_efficiency,
    })
}

/// Tier policy lookup from the configured table
pub fn tier_policy(tier: RiskTier, config: &PricingConfig) -> &TierPolicy {
    match tier {
        RiskTier::Conservative => &config.tiers.conservative,
        RiskTier::Balanced => &config.tiers.balanced,
        RiskTier::Aggressive => &config.tiers.aggressive,
    }
}

fn validate(params: &YieldParameters, config: &PricingConfig) -> Result<(), PricingError> {
    if params.commitment_amount <= Decimal::ZERO {
        return Err(PricingError::InvalidParameters(format!(
            "commitment {} must be positive",
            params.commitment_amount
        )));
    }
    if !config.allowed_durations.contains(&params.duration_days) {
        return Err(PricingError::InvalidParameters(format!(
            "duration {} days not in {:?}",
            params.duration_days, config.allowed_durations
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(now: DateTime<Utc>) -> AggregatedPrice {
        AggregatedPrice {
            price: dec!(94260),
            volatility: dec!(0.425),
            volatility_confident: true,
            range_low: dec!(93800),
            range_high: dec!(94900),
            source_count: 3,
            computed_at: now,
        }
    }

    fn params(tier: RiskTier) -> YieldParameters {
        YieldParameters {
            risk_tier: tier,
            commitment_amount: dec!(1.5),
            duration_days: 90,
        }
    }

    #[test]
    fn test_derived_strike_per_tier() {
        let now = Utc::now();
        let config = PricingConfig::default();
        let m = market(now);

        let conservative = price_yield(&params(RiskTier::Conservative), &m, &config, now).unwrap();
        let balanced = price_yield(&params(RiskTier::Balanced), &m, &config, now).unwrap();
        let aggressive = price_yield(&params(RiskTier::Aggressive), &m, &config, now).unwrap();

        assert_eq!(conservative.derived_strike, dec!(94260) * dec!(0.80));
        assert_eq!(balanced.derived_strike, dec!(94260) * dec!(0.90));
        assert_eq!(aggressive.derived_strike, dec!(94260));
    }

    #[test]
    fn test_riskier_tier_earns_more() {
        let now = Utc::now();
        let config = PricingConfig::default();
        let m = market(now);

        let conservative = price_yield(&params(RiskTier::Conservative), &m, &config, now).unwrap();
        let balanced = price_yield(&params(RiskTier::Balanced), &m, &config, now).unwrap();
        let aggressive = price_yield(&params(RiskTier::Aggressive), &m, &config, now).unwrap();

        assert!(conservative.estimated_yield < balanced.estimated_yield);
        assert!(balanced.estimated_yield < aggressive.estimated_yield);
    }

    #[test]
    fn test_break_even_below_strike() {
        let now = Utc::now();
        let result = price_yield(
            &params(RiskTier::Balanced),
            &market(now),
            &PricingConfig::default(),
            now,
        )
        .unwrap();
        assert!(result.break_even_acquisition_price < result.derived_strike);
        assert!(result.break_even_acquisition_price > Decimal::ZERO);
    }

    #[test]
    fn test_capital_efficiency_is_yield_over_exposure() {
        let now = Utc::now();
        let p = params(RiskTier::Aggressive);
        let result = price_yield(&p, &market(now), &PricingConfig::default(), now).unwrap();
        let expected =
            result.estimated_yield / p.commitment_amount / result.derived_strike;
        assert!((result.capital_efficiency - expected).abs() < dec!(0.0000001));
        assert!(result.capital_efficiency > Decimal::ZERO);
    }

    #[test]
    fn test_annualization_scales_with_duration() {
        let now = Utc::now();
        let config = PricingConfig::default();
        let m = market(now);
        let short = price_yield(
            &YieldParameters {
                duration_days: 30,
                ..params(RiskTier::Balanced)
            },
            &m,
            &config,
            now,
        )
        .unwrap();
        // Shorter commitments annualize to a higher rate for sqrt-time premia
        let long = price_yield(
            &YieldParameters {
                duration_days: 360,
                ..params(RiskTier::Balanced)
            },
            &m,
            &config,
            now,
        )
        .unwrap();
        assert!(short.annualized_yield_percent > long.annualized_yield_percent);
    }

    #[test]
    fn test_zero_commitment_rejected() {
        let now = Utc::now();
        let p = YieldParameters {
            commitment_amount: Decimal::ZERO,
            ..params(RiskTier::Balanced)
        };
        let err = price_yield(&p, &market(now), &PricingConfig::default(), now).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameters(_)));
    }

    #[test]
    fn test_bad_duration_rejected() {
        let now = Utc::now();
        let p = YieldParameters {
            duration_days: 7,
            ..params(RiskTier::Balanced)
        };
        assert!(price_yield(&p, &market(now), &PricingConfig::default(), now).is_err());
    }

    #[test]
    fn test_stale_market_refused() {
        let computed = Utc::now();
        let now = computed + chrono::Duration::hours(1);
        let err = price_yield(
            &params(RiskTier::Balanced),
            &market(computed),
            &PricingConfig::default(),
            now,
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::StaleMarketData { .. }));
    }

    #[test]
    fn test_deterministic() {
        let now = Utc::now();
        let m = market(now);
        let config = PricingConfig::default();
        let p = params(RiskTier::Conservative);
        let a = price_yield(&p, &m, &config, now).unwrap();
        let b = price_yield(&p, &m, &config, now).unwrap();
        assert_eq!(a.estimated_yield, b.estimated_yield);
        assert_eq!(a.annualized_yield_percent, b.annualized_yield_percent);
    }
}
