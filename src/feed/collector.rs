//! Bounded fan-out sample collection

use super::PriceSource;
use crate::oracle::PriceSample;
use crate::telemetry::{record_latency, LatencyMetric};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fetch all sources concurrently within one collection window.
///
/// A source that errors or does not answer inside the window is an
/// absent source for this cycle, never a blocking one.
pub async fn collect_samples(
    sources: &[Arc<dyn PriceSource>],
    window: Duration,
) -> Vec<PriceSample> {
    let fetches = sources.iter().map(|source| {
        let source = Arc::clone(source);
        async move {
            let started = Instant::now();
            match tokio::time::timeout(window, source.fetch()).await {
                Ok(Ok(sample)) => {
                    record_latency(LatencyMetric::SourceFetch, started.elapsed());
                    Some(sample)
                }
                Ok(Err(e)) => {
                    tracing::warn!(source = source.source_id(), error = %e, "source fetch failed");
                    None
                }
                Err(_) => {
                    tracing::warn!(
                        source = source.source_id(),
                        window_ms = window.as_millis() as u64,
                        "source missed the collection window"
                    );
                    None
                }
            }
        }
    });

    join_all(fetches).await.into_iter().flatten().collect()
}
