//! Buyer-side premium engine

use super::kernel::{per_unit_premium, to_decimal, to_f64, year_fraction};
use super::{
    ComponentBreakdown, PricingError, PricingResult, ProtectionParameters, Scenario,
};
use crate::config::PricingConfig;
use crate::oracle::AggregatedPrice;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Price a protection request against the current market signal.
///
/// Pure: same `(params, market)` always produce the same result. Time
/// is explicit through `market.computed_at`, `params.duration_days`
/// and `now`; refuses stale or low-confidence market data instead of
/// silently pricing on it.
pub fn price_protection(
    params: &ProtectionParameters,
    market: &AggregatedPrice,
    config: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<PricingResult, PricingError> {
    validate(params, config)?;
    check_market(market, config, now)?;

    let spot = market.price;
    let strike = spot * params.strike_percent / dec!(100);

    let t = year_fraction(params.duration_days);
    let sigma = to_f64(market.volatility);
    let spot_f = to_f64(spot);
    let strike_f = to_f64(strike);

    let unit = per_unit_premium(spot_f, strike_f, t, sigma);
    let premium = to_decimal(unit.total()) * params.amount;

    // Extrinsic value at the baseline volatility is the pure time
    // component; everything above it is attributed to volatility.
    let base_sigma = to_f64(config.baseline_volatility).min(sigma);
    let base_unit = per_unit_premium(spot_f, strike_f, t, base_sigma);
    let intrinsic_value = to_decimal(unit.intrinsic) * params.amount;
    let time_value = to_decimal(base_unit.time_value) * params.amount;
    let volatility_component = (premium - intrinsic_value - time_value).max(Decimal::ZERO);

    let per_unit = to_decimal(unit.total());
    let break_even_price = strike - per_unit;
    let max_benefit = strike * params.amount;
    let premium_percentage = per_unit / spot * dec!(100);

    let scenarios = build_scenarios(spot, strike, params.amount, premium, config);

    Ok(PricingResult {
        premium,
        premium_percentage,
        strike_price: strike,
        break_even_price,
        max_benefit,
        scenarios,
        breakdown: ComponentBreakdown {
            intrinsic_value,
            time_value,
            volatility_component,
        },
    })
}

fn validate(params: &ProtectionParameters, config: &PricingConfig) -> Result<(), PricingError> {
    if params.strike_percent < config.strike_percent_min
        || params.strike_percent > config.strike_percent_max
    {
        return Err(PricingError::InvalidParameters(format!(
            "strike {}% outside band {}%..{}%",
            params.strike_percent, config.strike_percent_min, config.strike_percent_max
        )));
    }
    if params.amount <= Decimal::ZERO {
        return Err(PricingError::InvalidParameters(format!(
            "amount {} must be positive",
            params.amount
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

/// Shared market-quality gate for both engines
pub(super) fn check_market(
    market: &AggregatedPrice,
    config: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<(), PricingError> {
    let age_secs = market.age(now).num_seconds();
    let max_secs = config.max_market_age_secs as i64;
    if age_secs > max_secs {
        return Err(PricingError::StaleMarketData { age_secs, max_secs });
    }
    if !market.volatility_confident {
        return Err(PricingError::LowConfidenceVolatility);
    }
    Ok(())
}

/// Payoffs at evenly spaced prices across the configured band,
/// ascending by price
fn build_scenarios(
    spot: Decimal,
    strike: Decimal,
    amount: Decimal,
    premium: Decimal,
    config: &PricingConfig,
) -> Vec<Scenario> {
    let steps = config.scenario_steps.max(2);
    let band = config.scenario_band_percent / dec!(100);
    let step = band * dec!(2) / Decimal::from(steps as u64 - 1);

    (0..steps)
        .map(|i| {
            let factor = Decimal::ONE - band + step * Decimal::from(i as u64);
            let price = spot * factor;
            let payoff = (strike - price).max(Decimal::ZERO) * amount - premium;
            Scenario { price, payoff }
        })
        .collect()
}
