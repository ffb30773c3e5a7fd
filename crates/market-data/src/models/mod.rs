//! Rate data models
//!
//! - `types` - Type aliases for common identifiers (ProviderId)
//! - `currency` - Supported crypto/fiat codes and their validation
//! - `query` - Validated currency pair (RateQuery)

mod currency;
mod query;
mod types;

pub use currency::{validate_currency, CryptoCurrency, CurrencyCode, CurrencyKind, FiatCurrency};
pub use query::RateQuery;
pub use types::ProviderId;
