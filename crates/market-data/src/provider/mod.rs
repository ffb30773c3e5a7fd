//! Exchange rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `RateProvider` trait that all providers implement
//! - Shared HTTP status and payload handling
//! - Concrete provider implementations (CoinAPI, CoinGecko, Coinbase)
//!
//! Providers are interchangeable: the resolver calls them in the configured
//! order and only looks at the returned rate or error.

mod http;
mod traits;

pub mod coinapi;
pub mod coinbase;
pub mod coingecko;

pub use coinapi::CoinApiProvider;
pub use coinbase::CoinbaseProvider;
pub use coingecko::CoinGeckoProvider;
pub use traits::RateProvider;
