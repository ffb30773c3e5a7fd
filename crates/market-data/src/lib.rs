//! Ratecast Market Data Crate
//!
//! This crate resolves the exchange rate of a crypto asset in a fiat
//! currency from a set of interchangeable third-party providers.
//!
//! # Overview
//!
//! - Supported codes: `BTC`, `ETH` against `USD`, `UAH`
//! - Providers: CoinAPI, CoinGecko, Coinbase
//! - Sequential fallback in a configured order, first success wins
//! - Cancellation and deadlines carried by [`RequestContext`]
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! | (crypto, fiat)   |  untrusted strings
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    RateQuery     |  validated pair
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   RateResolver   |  ordered chain over the ProviderRegistry
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   RateProvider   |  (CoinAPI, CoinGecko, Coinbase)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |       f64        |  rate
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`RateQuery`] - Validated crypto/fiat pair
//! - [`RateProvider`] - Capability implemented by every provider adapter
//! - [`ProviderRegistry`] - Providers keyed by id
//! - [`RateResolver`] - Fallback chain over the registry
//! - [`RequestContext`] - Cancellation signal and deadline

pub mod context;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use context::{CancellationSource, Interrupted, RequestContext};
pub use errors::{MarketDataError, RetryClass, ValidationError};

// Re-export all public types from models
pub use models::{
    validate_currency, CryptoCurrency, CurrencyCode, CurrencyKind, FiatCurrency, ProviderId,
    RateQuery,
};

// Re-export provider types
pub use provider::{CoinApiProvider, CoinGeckoProvider, CoinbaseProvider, RateProvider};

// Re-export registry types
pub use registry::{
    ProviderRegistry, RateResolver, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_PROVIDER_ORDER,
};
