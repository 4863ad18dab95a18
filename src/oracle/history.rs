//! Trailing aggregate history
//!
//! Bounded window of past aggregates used for volatility and 24h range

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Bounded trailing window of aggregated prices.
///
/// Owned exclusively by the aggregator; each cycle pushes one point.
pub struct AggregateHistory {
    max_points: usize,
    range_window: Duration,
    points: VecDeque<(DateTime<Utc>, Decimal)>,
}

impl AggregateHistory {
    /// Create a history bounded to `max_points` aggregates, with a
    /// separate time window for range computation
    pub fn new(max_points: usize, range_window: Duration) -> Self {
        Self {
            max_points,
            range_window,
            points: VecDeque::new(),
        }
    }

    /// Record a new aggregate, evicting the oldest beyond capacity
    pub fn push(&mut self, timestamp: DateTime<Utc>, price: Decimal) {
        self.points.push_back((timestamp, price));
        while self.points.len() > self.max_points {
            self.points.pop_front();
        }
    }

    /// Number of retained points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Annualized realized volatility from log returns over the window.
    ///
    /// Returns `None` with fewer than two points or no usable returns.
    pub fn volatility(&self) -> Option<Decimal> {
        if self.points.len() < 2 {
            return None;
        }

        let mut returns: Vec<f64> = Vec::with_capacity(self.points.len() - 1);
        for i in 1..self.points.len() {
            let prev: f64 = self.points[i - 1].1.try_into().unwrap_or(0.0);
            let curr: f64 = self.points[i].1.try_into().unwrap_or(0.0);
            if prev > 0.0 && curr > 0.0 {
                returns.push((curr / prev).ln());
            }
        }

        if returns.is_empty() {
            return None;
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        // Annualize by the observed spacing of the window.
        // seconds per year ≈ 31,536,000
        let span = (self.points.back()?.0 - self.points.front()?.0).num_seconds() as f64;
        if span <= 0.0 {
            return None;
        }
        let avg_interval = span / n;
        let intervals_per_year = 31_536_000.0 / avg_interval;
        let annualized = std_dev * intervals_per_year.sqrt();

        Decimal::try_from(annualized).ok()
    }

    /// Min/max of aggregates inside the range window ending at `now`
    pub fn range(&self, now: DateTime<Utc>) -> Option<(Decimal, Decimal)> {
        let cutoff = now - self.range_window;
        let mut low: Option<Decimal> = None;
        let mut high: Option<Decimal> = None;
        for (ts, price) in &self.points {
            if *ts < cutoff {
                continue;
            }
            low = Some(low.map_or(*price, |l: Decimal| l.min(*price)));
            high = Some(high.map_or(*price, |h: Decimal| h.max(*price)));
        }
        Some((low?, high?))
    }
}
