//! Error types and fallback classification for the market data crate.
//!
//! This module provides:
//! - [`ValidationError`]: Rejected currency codes (always client-attributable)
//! - [`MarketDataError`]: The main error enum for all rate operations
//! - [`RetryClass`]: Classification for determining fallback behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// A currency code that is not part of the supported allow-set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid crypto currency: {0}")]
    InvalidCryptoCurrency(String),

    #[error("invalid fiat currency: {0}")]
    InvalidFiatCurrency(String),
}

/// Errors that can occur during rate operations.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the resolver moves on to the next provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested currency pair failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    /// Try the next provider in the chain.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured order names a provider that is not registered.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Two providers were registered under the same identifier.
    #[error("Duplicate provider: {0}")]
    DuplicateProvider(String),

    /// The provider chain would be empty.
    #[error("No providers available")]
    NoProvidersAvailable,

    /// Every provider in the chain was tried and failed.
    ///
    /// Only the last provider's error is kept; earlier failures are logged
    /// while walking the chain.
    #[error("All {attempts} providers failed, last error: {last}")]
    AllProvidersFailed {
        /// Number of providers that were tried
        attempts: usize,
        /// The error returned by the last provider in the chain
        #[source]
        last: Box<MarketDataError>,
    },

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// The caller's deadline passed before a provider answered.
    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl MarketDataError {
    /// Returns the fallback classification for this error.
    ///
    /// - [`RetryClass::NextProvider`]: the failure is local to one provider
    /// - [`RetryClass::Never`]: bad input, bad configuration, or the caller
    ///   is no longer waiting
    ///
    /// # Examples
    ///
    /// ```
    /// use ratecast_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "coinapi".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::NextProvider);
    ///
    /// let error = MarketDataError::Cancelled;
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Provider-specific failures - try next provider
            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => RetryClass::NextProvider,

            // Terminal
            Self::Validation(_)
            | Self::UnknownProvider(_)
            | Self::DuplicateProvider(_)
            | Self::NoProvidersAvailable
            | Self::AllProvidersFailed { .. }
            | Self::Cancelled
            | Self::DeadlineExceeded => RetryClass::Never,
        }
    }

    /// The error of the last provider when every provider failed.
    pub fn last_provider_error(&self) -> Option<&MarketDataError> {
        match self {
            Self::AllProvidersFailed { last, .. } => Some(last),
            _ => None,
        }
    }

    /// Whether the error is a startup configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownProvider(_) | Self::DuplicateProvider(_) | Self::NoProvidersAvailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_tries_next_provider() {
        let error = MarketDataError::ProviderError {
            provider: "coinapi".to_string(),
            message: "Internal server error".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);
    }

    #[test]
    fn test_rate_limited_tries_next_provider() {
        let error = MarketDataError::RateLimited {
            provider: "coingecko".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);
    }

    #[test]
    fn test_timeout_tries_next_provider() {
        let error = MarketDataError::Timeout {
            provider: "coinbase".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);
    }

    #[test]
    fn test_validation_never_falls_through() {
        let error: MarketDataError =
            ValidationError::InvalidCryptoCurrency("DOGE".to_string()).into();
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_interruptions_never_fall_through() {
        assert_eq!(MarketDataError::Cancelled.retry_class(), RetryClass::Never);
        assert_eq!(
            MarketDataError::DeadlineExceeded.retry_class(),
            RetryClass::Never
        );
    }

    #[test]
    fn test_config_errors() {
        assert!(MarketDataError::UnknownProvider("kraken".to_string()).is_config_error());
        assert!(MarketDataError::DuplicateProvider("coinapi".to_string()).is_config_error());
        assert!(MarketDataError::NoProvidersAvailable.is_config_error());
        assert!(!MarketDataError::Cancelled.is_config_error());
    }

    #[test]
    fn test_all_providers_failed_keeps_last_error() {
        let error = MarketDataError::AllProvidersFailed {
            attempts: 3,
            last: Box::new(MarketDataError::ProviderError {
                provider: "coinbase".to_string(),
                message: "status 503".to_string(),
            }),
        };

        match error.last_provider_error() {
            Some(MarketDataError::ProviderError { provider, .. }) => {
                assert_eq!(provider, "coinbase")
            }
            other => panic!("unexpected last error: {:?}", other),
        }
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::from(ValidationError::InvalidFiatCurrency("usd".to_string()));
        assert_eq!(format!("{}", error), "invalid fiat currency: usd");

        let error = MarketDataError::RateLimited {
            provider: "coingecko".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: coingecko");

        let error = MarketDataError::AllProvidersFailed {
            attempts: 2,
            last: Box::new(MarketDataError::ProviderError {
                provider: "coinbase".to_string(),
                message: "API key invalid".to_string(),
            }),
        };
        assert_eq!(
            format!("{}", error),
            "All 2 providers failed, last error: Provider error: coinbase - API key invalid"
        );
    }
}
