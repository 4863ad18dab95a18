use clap::Parser;
use strike_shield::cli::{Cli, Commands};
use strike_shield::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    strike_shield::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting oracle loop");
            args.execute(&config).await?;
        }
        Commands::Quote(args) => {
            args.execute(&config).await?;
        }
        Commands::Provide(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Sources: {} (window {}ms)",
                config.feed.sources.len(),
                config.feed.collection_window_ms
            );
            println!(
                "  Oracle: min_sources={}, max_sample_age={}s, cycle={}s",
                config.oracle.min_sources,
                config.oracle.max_sample_age_secs,
                config.oracle.cycle_interval_secs
            );
            println!(
                "  Publisher: deviation={}, heartbeat={}s",
                config.publisher.deviation_threshold, config.publisher.max_staleness_secs
            );
            println!(
                "  Pricing: strikes {}%..{}%, durations {:?}",
                config.pricing.strike_percent_min,
                config.pricing.strike_percent_max,
                config.pricing.allowed_durations
            );
        }
    }

    Ok(())
}
