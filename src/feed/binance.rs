//! Binance REST spot price adapter

use super::PriceSource;
use crate::oracle::PriceSample;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Binance REST base URL
const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Binance ticker response
#[derive(Debug, Deserialize)]
struct BinanceTicker {
    #[allow(dead_code)]
    symbol: String,
    price: String,
}

/// Spot price from the Binance ticker endpoint
pub struct BinanceSource {
    client: reqwest::Client,
    symbol: String,
    weight: Decimal,
}

impl BinanceSource {
    /// Create a source for the given symbol with a reliability weight
    pub fn new(symbol: impl Into<String>, weight: Decimal) -> Self {
        Self {
            client: reqwest::Client::new(),
            symbol: symbol.into().to_uppercase(),
            weight,
        }
    }

    fn ticker_url(&self) -> String {
        format!("{}/ticker/price?symbol={}", BINANCE_API_URL, self.symbol)
    }

    /// Parse a ticker response body into a sample
    fn parse_response(&self, body: &str) -> anyhow::Result<PriceSample> {
        let ticker: BinanceTicker =
            serde_json::from_str(body).context("malformed Binance ticker response")?;
        let price = Decimal::from_str(&ticker.price)
            .with_context(|| format!("unparseable Binance price {:?}", ticker.price))?;
        Ok(PriceSample::new("binance", price, Utc::now(), self.weight))
    }
}

#[async_trait]
impl PriceSource for BinanceSource {
    fn source_id(&self) -> &str {
        "binance"
    }

    async fn fetch(&self) -> anyhow::Result<PriceSample> {
        let body = self
            .client
            .get(self.ticker_url())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        self.parse_response(&body)
    }
}
