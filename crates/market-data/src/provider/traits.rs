//! Rate provider trait definitions.
//!
//! This module defines the core `RateProvider` trait that all
//! rate providers must implement.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::errors::MarketDataError;

/// Trait for exchange rate providers.
///
/// Implement this trait to add support for a new rate source.
/// Request shaping (URLs, JSON fields, code translation such as
/// `BTC` -> `bitcoin`) lives entirely inside the implementation; the
/// resolver only sees codes in and a rate out.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use ratecast_market_data::provider::RateProvider;
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl RateProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "my_provider"
///     }
///
///     async fn get_rate(
///         &self,
///         _ctx: &RequestContext,
///         from: &str,
///         to: &str,
///     ) -> Result<f64, MarketDataError> {
///         // ... call the API
///     }
/// }
/// ```
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "coinapi", "coinbase", etc.
    /// Used for logging and for the configured fallback order.
    fn id(&self) -> &'static str;

    /// Fetch the current rate of `from` expressed in `to`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Cancellation and deadline of the calling request
    /// * `from` - Crypto code, already validated (e.g. "BTC")
    /// * `to` - Fiat code, already validated (e.g. "USD")
    ///
    /// # Returns
    ///
    /// A finite, positive rate on success, or a `MarketDataError` on failure.
    async fn get_rate(
        &self,
        ctx: &RequestContext,
        from: &str,
        to: &str,
    ) -> Result<f64, MarketDataError>;
}
