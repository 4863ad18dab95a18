//! Oracle service
//!
//! Serializes aggregation cycles and exposes the latest aggregate

use super::{AggregatedPrice, AggregationError, Aggregator, PriceSample};
use crate::config::OracleConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared oracle handle.
///
/// Cycles may be triggered by the timer and by manual refresh at the
/// same time; the aggregator mutex serializes them so the trailing
/// window is never interleaved. Consumers only ever see the latest
/// published aggregate, never raw samples.
pub struct OracleService {
    aggregator: Mutex<Aggregator>,
    latest: Arc<RwLock<Option<AggregatedPrice>>>,
}

impl OracleService {
    /// Create a service with a fresh trailing window
    pub fn new(config: OracleConfig) -> Self {
        Self {
            aggregator: Mutex::new(Aggregator::new(config)),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Run one serialized aggregation cycle
    pub async fn run_cycle(
        &self,
        samples: &[PriceSample],
        now: DateTime<Utc>,
    ) -> Result<AggregatedPrice, AggregationError> {
        let mut aggregator = self.aggregator.lock().await;
        let aggregate = aggregator.aggregate(samples, now)?;
        *self.latest.write().await = Some(aggregate.clone());
        Ok(aggregate)
    }

    /// Latest successful aggregate, if any cycle has completed
    pub async fn latest(&self) -> Option<AggregatedPrice> {
        self.latest.read().await.clone()
    }
}
