//! CLI interface for strike-shield
//!
//! Provides subcommands for:
//! - `run`: Drive the oracle aggregation and publish loop
//! - `quote`: Price a protection request
//! - `provide`: Estimate provider yield for a risk tier
//! - `config`: Show effective configuration

mod provide;
mod quote;
mod run;

pub use provide::ProvideArgs;
pub use quote::QuoteArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "strike-shield")]
#[command(about = "Price oracle and PUT-option pricing core for Bitcoin protection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the oracle aggregation and publish loop
    Run(RunArgs),
    /// Price a protection request
    Quote(QuoteArgs),
    /// Estimate provider yield for a risk tier
    Provide(ProvideArgs),
    /// Show effective configuration
    Config,
}
