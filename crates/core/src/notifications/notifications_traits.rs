//! Notifier and notification service traits.

use async_trait::async_trait;
use ratecast_market_data::RequestContext;

use super::{FanoutResult, Message};
use crate::errors::Result;

/// Delivers a single message to a single recipient.
#[async_trait]
pub trait NotifierTrait: Send + Sync {
    async fn send(&self, ctx: &RequestContext, message: &Message) -> Result<()>;
}

#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Send the current BTC/USD rate to every subscriber.
    ///
    /// Listing subscribers and fetching the rate are fatal on failure.
    /// Individual delivery failures are collected; when every delivery of a
    /// non-empty broadcast fails the result is `Error::AllDeliveriesFailed`.
    async fn broadcast(&self, ctx: &RequestContext) -> Result<FanoutResult>;
}
