//! HTTP plumbing shared by the provider adapters.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::MarketDataError;

/// Default HTTP request timeout. Kept below the resolver's per-attempt
/// timeout so a slow upstream surfaces as a `Timeout` from the client.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn build_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map a transport failure onto the provider error taxonomy.
pub(crate) fn request_error(provider: &str, err: reqwest::Error) -> MarketDataError {
    if err.is_timeout() {
        MarketDataError::Timeout {
            provider: provider.to_string(),
        }
    } else if err.is_connect() {
        MarketDataError::Network(err)
    } else {
        MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }
}

/// Reject non-200 responses and decode the JSON body.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, MarketDataError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if status != StatusCode::OK {
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("status {}", status),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("failed to decode response: {}", e),
        })
}

/// Providers must hand back a usable number.
pub(crate) fn validate_rate(provider: &str, rate: f64) -> Result<f64, MarketDataError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("invalid rate: {}", rate),
        })
    }
}
