//! Publish decision policy

use super::{PublishPayload, PublishedPrice};
use crate::config::PublisherConfig;
use crate::oracle::AggregatedPrice;
use crate::pricing::to_fixed_point;
use chrono::{DateTime, Duration, Utc};

/// Deviation-or-heartbeat publish policy.
///
/// Bounds on-ledger write frequency (cost) while bounding staleness
/// (correctness): publish on first value, on a relative move at or
/// above the threshold, or when the published value ages out.
pub struct PublishPolicy {
    config: PublisherConfig,
}

impl PublishPolicy {
    /// Create a policy from publisher configuration
    pub fn new(config: PublisherConfig) -> Self {
        Self { config }
    }

    /// Whether `current` warrants an on-ledger write.
    ///
    /// Safe to evaluate redundantly from concurrent callers; actual
    /// submissions are deduplicated by `PublishGuard`.
    pub fn should_publish(
        &self,
        current: &AggregatedPrice,
        last: Option<&PublishedPrice>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(last) = last else {
            return true;
        };

        let deviation = (current.price - last.price).abs() / last.price;
        if deviation >= self.config.deviation_threshold {
            return true;
        }

        now - last.published_at >= Duration::seconds(self.config.max_staleness_secs as i64)
    }

    /// Package the aggregate as a fixed-point ledger write
    pub fn build_payload(&self, current: &AggregatedPrice) -> PublishPayload {
        PublishPayload {
            price_fp: to_fixed_point(current.price) as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn aggregate(price: Decimal, now: DateTime<Utc>) -> AggregatedPrice {
        AggregatedPrice {
            price,
            volatility: dec!(0.425),
            volatility_confident: true,
            range_low: price,
            range_high: price,
            source_count: 3,
            computed_at: now,
        }
    }

    fn last(price: Decimal, published_at: DateTime<Utc>) -> PublishedPrice {
        PublishedPrice {
            price,
            published_at,
        }
    }

    fn policy() -> PublishPolicy {
        PublishPolicy::new(PublisherConfig::default())
    }

    #[test]
    fn test_first_value_publishes() {
        let now = Utc::now();
        assert!(policy().should_publish(&aggregate(dec!(94260), now), None, now));
    }

    #[test]
    fn test_small_move_does_not_publish() {
        // 90,000 -> 90,500 is a 0.56% move, below the 1% threshold
        let now = Utc::now();
        let current = aggregate(dec!(90500), now);
        let published = last(dec!(90000), now);
        assert!(!policy().should_publish(&current, Some(&published), now));
    }

    #[test]
    fn test_large_move_publishes() {
        // 90,000 -> 91,200 is a 1.33% move
        let now = Utc::now();
        let current = aggregate(dec!(91200), now);
        let published = last(dec!(90000), now);
        assert!(policy().should_publish(&current, Some(&published), now));
    }

    #[test]
    fn test_downward_move_publishes() {
        let now = Utc::now();
        let current = aggregate(dec!(88800), now);
        let published = last(dec!(90000), now);
        assert!(policy().should_publish(&current, Some(&published), now));
    }

    #[test]
    fn test_exact_threshold_publishes() {
        let now = Utc::now();
        let current = aggregate(dec!(90900), now);
        let published = last(dec!(90000), now);
        assert!(policy().should_publish(&current, Some(&published), now));
    }

    #[test]
    fn test_heartbeat_publishes_when_stale() {
        let now = Utc::now();
        let current = aggregate(dec!(90100), now);
        let published = last(dec!(90000), now - Duration::hours(2));
        assert!(policy().should_publish(&current, Some(&published), now));
    }

    #[test]
    fn test_fresh_and_close_does_not_publish() {
        let now = Utc::now();
        let current = aggregate(dec!(90100), now);
        let published = last(dec!(90000), now - Duration::minutes(5));
        assert!(!policy().should_publish(&current, Some(&published), now));
    }

    #[test]
    fn test_payload_is_fixed_point() {
        let now = Utc::now();
        let payload = policy().build_payload(&aggregate(dec!(94260.5), now));
        assert_eq!(payload.price_fp, 9_426_050_000_000);
        assert_eq!(payload.price(), dec!(94260.50000000));
    }
}
