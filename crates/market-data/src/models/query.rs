use serde::Serialize;

use super::currency::{CryptoCurrency, FiatCurrency};
use crate::errors::ValidationError;

/// A validated (crypto, fiat) pair.
///
/// Both members are typed, so a `RateQuery` can never carry an unknown code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RateQuery {
    pub crypto: CryptoCurrency,
    pub fiat: FiatCurrency,
}

impl RateQuery {
    pub fn new(crypto: CryptoCurrency, fiat: FiatCurrency) -> Self {
        Self { crypto, fiat }
    }

    /// Parse a pair from untrusted strings.
    ///
    /// The crypto code is checked first, so a request with two bad codes
    /// reports the crypto one.
    pub fn parse(crypto: &str, fiat: &str) -> Result<Self, ValidationError> {
        let crypto = CryptoCurrency::parse(crypto)?;
        let fiat = FiatCurrency::parse(fiat)?;
        Ok(Self { crypto, fiat })
    }
}

impl Default for RateQuery {
    /// BTC/USD, the pair broadcast to subscribers.
    fn default() -> Self {
        Self::new(CryptoCurrency::Btc, FiatCurrency::Usd)
    }
}

impl std::fmt::Display for RateQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.crypto, self.fiat)
    }
}
