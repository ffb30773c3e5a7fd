use async_trait::async_trait;
use log::{debug, info};
use ratecast_market_data::RequestContext;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{validate_email, SubscriberRepositoryTrait, SubscriberServiceTrait};
use crate::errors::{Error, Result};

pub struct SubscriberService {
    repository: Arc<dyn SubscriberRepositoryTrait>,
    // Serializes exist-then-save within this process
    subscribe_lock: Mutex<()>,
}

impl SubscriberService {
    pub fn new(repository: Arc<dyn SubscriberRepositoryTrait>) -> Self {
        Self {
            repository,
            subscribe_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SubscriberServiceTrait for SubscriberService {
    async fn subscribe(&self, ctx: &RequestContext, email: &str) -> Result<()> {
        validate_email(email)?;

        let _guard = ctx.run(self.subscribe_lock.lock()).await?;

        if ctx.run(self.repository.exist(ctx, email)).await?? {
            info!("Subscribe rejected, {} is already subscribed", email);
            return Err(Error::AlreadySubscribed(email.to_string()));
        }

        ctx.run(self.repository.save(ctx, email)).await??;
        debug!("Subscribed {}", email);
        Ok(())
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        ctx.run(self.repository.list(ctx)).await?
    }

    async fn ping(&self, ctx: &RequestContext) -> Result<()> {
        ctx.run(self.repository.ping(ctx)).await?
    }
}
