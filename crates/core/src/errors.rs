//! Core error types for Ratecast.
//!
//! Storage and transport errors are converted to these types by the crates
//! implementing the repository and notifier traits.

use ratecast_market_data::{Interrupted, MarketDataError};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the Ratecast services.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(MarketDataError),

    #[error("Subscriber store error: {0}")]
    Store(String),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("Already subscribed: {0}")]
    AlreadySubscribed(String),

    #[error("Failed to send rate info to all {} subscribers", failed_recipients.len())]
    AllDeliveriesFailed { failed_recipients: Vec<String> },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Currency(#[from] ratecast_market_data::ValidationError),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl Error {
    /// Whether the caller gave up (cancellation or deadline).
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }
}

// === From implementations for common error types ===

impl From<MarketDataError> for Error {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::Validation(e) => Error::Validation(ValidationError::Currency(e)),
            MarketDataError::Cancelled => Error::Cancelled,
            MarketDataError::DeadlineExceeded => Error::DeadlineExceeded,
            other => Error::MarketData(other),
        }
    }
}

impl From<ratecast_market_data::ValidationError> for Error {
    fn from(err: ratecast_market_data::ValidationError) -> Self {
        Error::Validation(ValidationError::Currency(err))
    }
}

impl From<Interrupted> for Error {
    fn from(value: Interrupted) -> Self {
        match value {
            Interrupted::Cancelled => Error::Cancelled,
            Interrupted::DeadlineExceeded => Error::DeadlineExceeded,
        }
    }
}
