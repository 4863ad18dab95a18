//! Oracle run loop

use crate::config::Config;
use crate::feed::{build_sources, collect_samples};
use crate::oracle::OracleService;
use crate::publisher::{PublishGuard, PublishPolicy, PublishedPrice};
use crate::telemetry::{record_latency, set_gauge, GaugeMetric, LatencyMetric};
use chrono::Utc;
use clap::Args;
use std::time::{Duration, Instant};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run a single aggregation cycle and exit
    #[arg(long)]
    pub once: bool,
}

impl RunArgs {
    /// Drive timed aggregation cycles and the publish policy
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let sources = build_sources(&config.feed);
        let service = OracleService::new(config.oracle.clone());
        let policy = PublishPolicy::new(config.publisher.clone());
        let guard = PublishGuard::new();
        let window = Duration::from_millis(config.feed.collection_window_ms);

        let mut last_published: Option<PublishedPrice> = None;
        let mut failed_cycles: u64 = 0;
        let mut publish_count: u64 = 0;
        let mut interval =
            tokio::time::interval(Duration::from_secs(config.oracle.cycle_interval_secs));

        tracing::info!(
            sources = sources.len(),
            interval_secs = config.oracle.cycle_interval_secs,
            "oracle loop starting"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutting down");
                    return Ok(());
                }
            }

            let now = Utc::now();
            let cycle_started = Instant::now();
            let samples = collect_samples(&sources, window).await;
            let cycle = service.run_cycle(&samples, now).await;
            record_latency(LatencyMetric::Aggregation, cycle_started.elapsed());

            match cycle {
                Ok(aggregate) => {
                    tracing::info!(
                        price = %aggregate.price,
                        volatility = %aggregate.volatility,
                        sources = aggregate.source_count,
                        "aggregation cycle complete"
                    );
                    set_gauge(GaugeMetric::OraclePrice, f64::try_from(aggregate.price)?);
                    set_gauge(
                        GaugeMetric::OracleVolatility,
                        f64::try_from(aggregate.volatility)?,
                    );
                    set_gauge(GaugeMetric::SourceCount, aggregate.source_count as f64);
                    set_gauge(
                        GaugeMetric::RangeWidth,
                        f64::try_from(aggregate.range_high - aggregate.range_low)?,
                    );

                    if policy.should_publish(&aggregate, last_published.as_ref(), now) {
                        if let Some(attempt) = guard.begin() {
                            let payload = policy.build_payload(&aggregate);
                            // Ledger submission lives outside this core;
                            // the packaged write is handed off here.
                            tracing::info!(
                                sequence = attempt.sequence,
                                price_fp = payload.price_fp,
                                "publishing price to ledger"
                            );
                            last_published = Some(PublishedPrice {
                                price: payload.price(),
                                published_at: now,
                            });
                            publish_count += 1;
                            set_gauge(GaugeMetric::PublishCount, publish_count as f64);
                            guard.finish(attempt);
                        }
                    }
                }
                Err(e) => {
                    failed_cycles += 1;
                    set_gauge(GaugeMetric::FailedCycles, failed_cycles as f64);
                    tracing::warn!(error = %e, "aggregation cycle failed");
                }
            }

            if self.once {
                return Ok(());
            }
        }
    }
}
