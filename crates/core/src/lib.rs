//! Ratecast Core - Domain services and traits.
//!
//! This crate contains the business logic of Ratecast: looking up a rate,
//! managing subscribers and broadcasting the current rate to them. It is
//! storage- and transport-agnostic and defines the traits implemented by
//! the `storage-file` and `notifier` crates.

pub mod errors;
pub mod notifications;
pub mod rates;
pub mod subscribers;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

// Context types travel through every service call
pub use ratecast_market_data::{CancellationSource, RequestContext};
