//! Coinbase exchange rate provider.
//!
//! Uses `/exchange-rates?currency={code}`, which returns every quote for
//! the base currency with the rates encoded as decimal strings.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::context::RequestContext;
use crate::errors::MarketDataError;
use crate::provider::http::{build_client, decode_json, request_error, validate_rate};
use crate::provider::RateProvider;

const BASE_URL: &str = "https://api.coinbase.com/v2";
pub const PROVIDER_ID: &str = "coinbase";

#[derive(Debug, Deserialize)]
struct ExchangeRatesResponse {
    data: ExchangeRatesData,
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesData {
    rates: HashMap<String, String>,
}

/// Coinbase rate provider. No API key required.
pub struct CoinbaseProvider {
    client: Client,
    base_url: String,
}

impl CoinbaseProvider {
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
        format!("{}/exchange-rates", self.base_url)
    }

    fn extract_rate(body: &ExchangeRatesResponse, to: &str) -> Result<f64, MarketDataError> {
        let raw = body
            .data
            .rates
            .get(to)
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("no rate for {}", to),
            })?;

        raw.parse::<f64>()
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("unparseable rate {:?}: {}", raw, e),
            })
    }
}

impl Default for CoinbaseProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for CoinbaseProvider {
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

        debug!("Coinbase request: currency={}", from);

        let response = self
            .client
            .get(self.url())
            .query(&[("currency", from)])
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, e))?;

        let body: ExchangeRatesResponse = decode_json(PROVIDER_ID, response).await?;
        let rate = Self::extract_rate(&body, to)?;
        validate_rate(PROVIDER_ID, rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ExchangeRatesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(CoinbaseProvider::new().id(), "coinbase");
    }

    #[test]
    fn test_extract_rate() {
        let body = parse(r#"{"data":{"currency":"BTC","rates":{"USD":"27000.5","UAH":"990000.12"}}}"#);
        assert_eq!(CoinbaseProvider::extract_rate(&body, "USD").unwrap(), 27000.5);
        assert_eq!(CoinbaseProvider::extract_rate(&body, "UAH").unwrap(), 990000.12);
    }

    #[test]
    fn test_extract_rate_missing_quote() {
        let body = parse(r#"{"data":{"currency":"BTC","rates":{"USD":"27000.5"}}}"#);
        assert!(matches!(
            CoinbaseProvider::extract_rate(&body, "UAH"),
            Err(MarketDataError::ProviderError { .. })
        ));
    }

    #[test]
    fn test_extract_rate_not_a_number() {
        let body = parse(r#"{"data":{"currency":"BTC","rates":{"USD":"n/a"}}}"#);
        assert!(CoinbaseProvider::extract_rate(&body, "USD").is_err());
    }
}
