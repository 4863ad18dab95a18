//! Coinbase REST spot price adapter

use super::PriceSource;
use crate::oracle::PriceSample;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Coinbase REST base URL
const COINBASE_API_URL: &str = "https://api.coinbase.com/v2";

/// Coinbase spot price response
#[derive(Debug, Deserialize)]
struct CoinbaseSpot {
    data: CoinbaseSpotData,
}

#[derive(Debug, Deserialize)]
struct CoinbaseSpotData {
    amount: String,
    #[allow(dead_code)]
    currency: String,
}

/// Spot price from the Coinbase prices endpoint
pub struct CoinbaseSource {
    client: reqwest::Client,
    pair: String,
    weight: Decimal,
}

impl CoinbaseSource {
    /// Create a source for the given pair (e.g. "BTC-USD")
    pub fn new(pair: impl Into<String>, weight: Decimal) -> Self {
        Self {
            client: reqwest::Client::new(),
            pair: pair.into().to_uppercase(),
            weight,
        }
    }

    fn spot_url(&self) -> String {
        format!("{}/prices/{}/spot", COINBASE_API_URL, self.pair)
    }

    /// Parse a spot price response body into a sample
    fn parse_response(&self, body: &str) -> anyhow::Result<PriceSample> {
        let spot: CoinbaseSpot =
            serde_json::from_str(body).context("malformed Coinbase spot response")?;
        let price = Decimal::from_str(&spot.data.amount)
            .with_context(|| format!("unparseable Coinbase price {:?}", spot.data.amount))?;
        Ok(PriceSample::new("coinbase", price, Utc::now(), self.weight))
    }
}

#[async_trait]
impl PriceSource for CoinbaseSource {
    fn source_id(&self) -> &str {
        "coinbase"
    }

    async fn fetch(&self) -> anyhow::Result<PriceSample> {
        let body = self
            .client
            .get(self.spot_url())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        self.parse_response(&body)
    }
}
