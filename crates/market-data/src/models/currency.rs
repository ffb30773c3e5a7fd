//! Supported currency codes.
//!
//! Codes from untrusted input become [`CryptoCurrency`] / [`FiatCurrency`]
//! only through a fallible parse. Matching is exact and case-sensitive:
//! `"btc"` and `" BTC"` are rejected, nothing is trimmed or folded.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::errors::ValidationError;

/// Crypto assets a rate can be quoted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CryptoCurrency {
    Btc,
    Eth,
}

impl CryptoCurrency {
    /// Every supported crypto code.
    pub const ALL: &'static [CryptoCurrency] = &[CryptoCurrency::Btc, CryptoCurrency::Eth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
        }
    }

    /// Validate a crypto code.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| ValidationError::InvalidCryptoCurrency(code.to_string()))
    }
}

/// Fiat currencies a rate can be quoted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FiatCurrency {
    Usd,
    Uah,
}

impl FiatCurrency {
    /// Every supported fiat code.
    pub const ALL: &'static [FiatCurrency] = &[FiatCurrency::Usd, FiatCurrency::Uah];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Uah => "UAH",
        }
    }

    /// Validate a fiat code.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| ValidationError::InvalidFiatCurrency(code.to_string()))
    }
}

/// Which allow-set a code is validated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrencyKind {
    Crypto,
    Fiat,
}

/// A validated code of either kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurrencyCode {
    Crypto(CryptoCurrency),
    Fiat(FiatCurrency),
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crypto(c) => c.as_str(),
            Self::Fiat(f) => f.as_str(),
        }
    }

    pub fn kind(&self) -> CurrencyKind {
        match self {
            Self::Crypto(_) => CurrencyKind::Crypto,
            Self::Fiat(_) => CurrencyKind::Fiat,
        }
    }
}

/// Validate `code` against the allow-set for `kind`.
pub fn validate_currency(code: &str, kind: CurrencyKind) -> Result<CurrencyCode, ValidationError> {
    match kind {
        CurrencyKind::Crypto => CryptoCurrency::parse(code).map(CurrencyCode::Crypto),
        CurrencyKind::Fiat => FiatCurrency::parse(code).map(CurrencyCode::Fiat),
    }
}

macro_rules! impl_code_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

impl_code_traits!(CryptoCurrency);
impl_code_traits!(FiatCurrency);

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
