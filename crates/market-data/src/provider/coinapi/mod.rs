//! CoinAPI exchange rate provider.
//!
//! Uses the `/exchangerate/{base}/{quote}` endpoint, authenticated with the
//! `X-CoinAPI-Key` header.
//! API documentation: https://docs.coinapi.io/market-data/rest-api/exchange-rates

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::context::RequestContext;
use crate::errors::MarketDataError;
use crate::provider::http::{build_client, decode_json, request_error, validate_rate};
use crate::provider::RateProvider;

const BASE_URL: &str = "https://rest.coinapi.io/v1";
pub const PROVIDER_ID: &str = "coinapi";

/// Response from /exchangerate/{base}/{quote}
#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    rate: f64,
}

/// CoinAPI rate provider.
pub struct CoinApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CoinApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_client(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different host (test servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, from: &str, to: &str) -> String {
        format!("{}/exchangerate/{}/{}", self.base_url, from, to)
    }
}

#[async_trait]
impl RateProvider for CoinApiProvider {
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

        let url = self.url(from, to);
        debug!("CoinAPI request: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-CoinAPI-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, e))?;

        let body: ExchangeRateResponse = decode_json(PROVIDER_ID, response).await?;
        validate_rate(PROVIDER_ID, body.rate)
    }
}
