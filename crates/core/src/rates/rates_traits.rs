//! Service trait for rate lookups.

use async_trait::async_trait;
use ratecast_market_data::RequestContext;

use crate::errors::Result;

/// Entry point for turning a currency pair into a rate.
#[async_trait]
pub trait RateServiceTrait: Send + Sync {
    /// Rate of `crypto` expressed in `fiat`, both given as untrusted codes.
    async fn get_rate(&self, ctx: &RequestContext, crypto: &str, fiat: &str) -> Result<f64>;
}
