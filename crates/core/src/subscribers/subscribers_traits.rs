//! Repository and service traits for subscribers.

use async_trait::async_trait;
use ratecast_market_data::RequestContext;

use crate::errors::Result;

/// Persistent set of subscriber email addresses.
///
/// Implementations keep insertion order and never update or delete entries.
#[async_trait]
pub trait SubscriberRepositoryTrait: Send + Sync {
    /// Append an address. Uniqueness is the caller's concern.
    async fn save(&self, ctx: &RequestContext, email: &str) -> Result<()>;

    /// All addresses in insertion order.
    async fn list(&self, ctx: &RequestContext) -> Result<Vec<String>>;

    /// Exact, case-sensitive membership test.
    async fn exist(&self, ctx: &RequestContext, email: &str) -> Result<bool>;

    /// Whether the backing store is reachable.
    async fn ping(&self, ctx: &RequestContext) -> Result<()>;
}

#[async_trait]
pub trait SubscriberServiceTrait: Send + Sync {
    /// Add `email` to the subscribers, failing with `AlreadySubscribed` for
    /// a known address.
    async fn subscribe(&self, ctx: &RequestContext, email: &str) -> Result<()>;

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<String>>;

    async fn ping(&self, ctx: &RequestContext) -> Result<()>;
}
