//! Price aggregation
//!
//! Freshness filter, median/MAD outlier rejection, weighted mean

use super::history::AggregateHistory;
use super::{AggregatedPrice, AggregationError, PriceSample};
use crate::config::OracleConfig;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Floor for the deviation spread, as a fraction of the median.
/// Keeps tightly-agreeing sources from rejecting each other over dust.
const MAD_FLOOR_RATIO: Decimal = dec!(0.0001);

/// Turns one cycle's samples into an `AggregatedPrice`.
///
/// Owns the trailing window exclusively; callers must serialize cycles.
pub struct Aggregator {
    config: OracleConfig,
    history: AggregateHistory,
}

impl Aggregator {
    /// Create an aggregator with the given oracle configuration
    pub fn new(config: OracleConfig) -> Self {
        let history = AggregateHistory::new(
            config.history_points,
            Duration::hours(config.range_window_hours),
        );
        Self { config, history }
    }

    /// Run one aggregation cycle over the collected samples.
    ///
    /// Fails with `InsufficientSources` rather than fabricating a price;
    /// the trailing window is only advanced on success.
    pub fn aggregate(
        &mut self,
        samples: &[PriceSample],
        now: DateTime<Utc>,
    ) -> Result<AggregatedPrice, AggregationError> {
        let max_age = Duration::seconds(self.config.max_sample_age_secs as i64);

        let fresh: Vec<&PriceSample> = samples
            .iter()
            .filter(|s| s.is_valid() && now - s.observed_at <= max_age)
            .collect();

        let survivors = reject_outliers(&fresh, self.config.mad_multiplier);

        if survivors.len() < self.config.min_sources {
            return Err(AggregationError::InsufficientSources {
                got: survivors.len(),
                need: self.config.min_sources,
            });
        }

        let price = weighted_mean(&survivors);

        self.history.push(now, price);

        let volatility = self.history.volatility().unwrap_or(Decimal::ZERO);
        let volatility_confident = self.history.len() >= self.config.min_volatility_points;

        // Current price was just pushed, so the range always brackets it
        let (range_low, range_high) = self
            .history
            .range(now)
            .unwrap_or((price, price));

        Ok(AggregatedPrice {
            price,
            volatility,
            volatility_confident,
            range_low,
            range_high,
            source_count: survivors.len(),
            computed_at: now,
        })
    }
}

/// Median of a non-empty slice of decimals
fn median(values: &mut [Decimal]) -> Decimal {
    values.sort();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / dec!(2)
    }
}

/// Median/MAD outlier rejection.
///
/// Drops samples deviating from the median by more than
/// `mad_multiplier` times the median absolute deviation. When the MAD
/// degenerates (half the sources agree exactly) the spread falls back
/// to the mean absolute deviation, so exact agreement between two
/// sources cannot veto an honest divergent third.
fn reject_outliers<'a>(samples: &[&'a PriceSample], mad_multiplier: Decimal) -> Vec<&'a PriceSample> {
    if samples.len() < 3 {
        // Too few points for a meaningful deviation estimate
        return samples.to_vec();
    }

    let mut prices: Vec<Decimal> = samples.iter().map(|s| s.price).collect();
    let med = median(&mut prices);

    let mut deviations: Vec<Decimal> = samples.iter().map(|s| (s.price - med).abs()).collect();
    let mad = median(&mut deviations);

    let floor = med * MAD_FLOOR_RATIO;
    let spread = if mad <= floor {
        let mean_dev: Decimal =
            deviations.iter().sum::<Decimal>() / Decimal::from(deviations.len());
        mean_dev.max(floor)
    } else {
        mad
    };

    let cutoff = spread * mad_multiplier;
    samples
        .iter()
        .filter(|s| (s.price - med).abs() <= cutoff)
        .copied()
        .collect()
}

/// Weight-averaged price over surviving samples
fn weighted_mean(samples: &[&PriceSample]) -> Decimal {
    let total_weight: Decimal = samples.iter().map(|s| s.weight).sum();
    let weighted_sum: Decimal = samples.iter().map(|s| s.price * s.weight).sum();
    weighted_sum / total_weight
}
