//! CoinGecko exchange rate provider.
//!
//! Uses the public `/simple/price` endpoint. CoinGecko addresses coins by
//! id (`bitcoin`, `ethereum`) and fiat by lowercase code, so codes are
//! translated here before the request is made.
//! API documentation: https://docs.coingecko.com/reference/simple-price

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::context::RequestContext;
use crate::errors::MarketDataError;
use crate::provider::http::{build_client, decode_json, request_error, validate_rate};
use crate::provider::RateProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const PROVIDER_ID: &str = "coingecko";

/// Response from /simple/price: `{"bitcoin": {"usd": 27000.5}}`
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Map a crypto code to the CoinGecko coin id.
fn coin_id(code: &str) -> Option<&'static str> {
    match code {
        "BTC" => Some("bitcoin"),
        "ETH" => Some("ethereum"),
        _ => None,
    }
}

/// CoinGecko rate provider. No API key required.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self {
            client: build_client(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/simple/price", self.base_url)
    }

    fn extract_rate(
        body: &SimplePriceResponse,
        id: &str,
        fiat: &str,
    ) -> Result<f64, MarketDataError> {
        body.get(id)
            .and_then(|prices| prices.get(fiat))
            .copied()
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("no {} price for {}", fiat, id),
            })
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_rate(
        &self,
        ctx: &RequestContext,
        from: &str,
        to: &str,
    ) -> Result<f64, MarketDataError> {
        ctx.check()?;

        let id = coin_id(from).ok_or_else(|| MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("unsupported coin: {}", from),
        })?;
        let fiat = to.to_lowercase();

        debug!("CoinGecko request: ids={} vs_currencies={}", id, fiat);

        let response = self
            .client
            .get(self.url())
            .query(&[("ids", id), ("vs_currencies", fiat.as_str())])
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, e))?;

        let body: SimplePriceResponse = decode_json(PROVIDER_ID, response).await?;
        let rate = Self::extract_rate(&body, id, &fiat)?;
        validate_rate(PROVIDER_ID, rate)
    }
}
