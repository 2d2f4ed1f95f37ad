use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::rates::{FetchedRates, RateProvider};

// RateProvider implementation backed by the public exchangerate-api endpoint.
// One unauthenticated GET with USD as the base currency; no query parameters,
// no retries.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "RateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<FetchedRates> {
        let url = format!("{}/v4/latest/USD", self.base_url);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("prysmcalc/1.0")
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from rate endpoint",
                response.status()
            ));
        }

        let text = response.text().await?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rate response: {}", e))?;

        data.rates
            .ok_or_else(|| anyhow!("Rate response is missing the rates field"))
    }
}
